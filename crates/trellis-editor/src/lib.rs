pub mod behavior;
pub mod canvas;
pub mod commands;
pub mod components;
pub mod config;
pub mod drag;
pub mod error;
pub mod history;
pub mod input;
pub mod layout;
pub mod loader;
pub mod notice;
pub mod panel;
pub mod shortcuts;
pub mod templates;

pub use behavior::Behavior;
pub use canvas::Canvas;
pub use commands::{Command, Outcome};
pub use components::ComponentRegistry;
pub use config::CanvasConfig;
pub use drag::{DragEngine, DragState, DropIndicator, DropPosition};
pub use error::{EditorError, EditorResult};
pub use history::{Content, History, Snapshot};
pub use input::{InputEvent, Modifiers};
pub use layout::{LayoutProbe, StaticLayout};
pub use notice::{Notice, NoticeLevel};
pub use panel::{PanelSnapshot, PanelState};
pub use templates::TEMPLATE_NAMES;
