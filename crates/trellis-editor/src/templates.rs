//! Starter templates, as static markup.

pub const TEMPLATE_NAMES: &[&str] = &["blank", "landing", "portfolio", "blog"];

pub fn template(name: &str) -> Option<&'static str> {
    match name {
        "blank" => Some(""),
        "landing" => Some(LANDING),
        "portfolio" => Some(PORTFOLIO),
        "blog" => Some(BLOG),
        _ => None,
    }
}

const LANDING: &str = r##"<nav class="navbar">
  <span class="brand">Launchpad</span>
  <div class="nav-links"><a href="#features">Features</a><a href="#pricing">Pricing</a><a href="#contact">Contact</a></div>
</nav>
<section class="hero">
  <h1>Ship your idea this weekend</h1>
  <p>Everything you need to launch a beautiful landing page.</p>
  <button class="btn btn-primary" type="button">Get started</button>
</section>
<section class="container" id="features">
  <h2>Features</h2>
  <div class="grid-3">
    <div class="card"><h3>Fast</h3><p>Pages load in a blink.</p></div>
    <div class="card"><h3>Flexible</h3><p>Drag anything anywhere.</p></div>
    <div class="card"><h3>Portable</h3><p>Export clean HTML.</p></div>
  </div>
</section>
<section class="container" id="pricing">
  <h2>Pricing</h2>
  <div class="grid-2">
    <div class="card"><h3>Starter</h3><p>Free forever.</p></div>
    <div class="card"><h3>Pro</h3><p>$12 per month.</p></div>
  </div>
</section>
<footer class="footer" id="contact"><p>© 2026 Launchpad. All rights reserved.</p></footer>
"##;

const PORTFOLIO: &str = r##"<nav class="navbar">
  <span class="brand">Jordan Lee</span>
  <div class="nav-links"><a href="#work">Work</a><a href="#about">About</a></div>
</nav>
<section class="hero">
  <h1>Designer and developer</h1>
  <p>I build calm, useful interfaces.</p>
</section>
<section class="container" id="work">
  <h2>Selected work</h2>
  <div class="grid-3">
    <div class="card"><img src="https://via.placeholder.com/400x300" alt="Project one"><h3>Project one</h3></div>
    <div class="card"><img src="https://via.placeholder.com/400x300" alt="Project two"><h3>Project two</h3></div>
    <div class="card"><img src="https://via.placeholder.com/400x300" alt="Project three"><h3>Project three</h3></div>
  </div>
</section>
<section class="container" id="about">
  <h2>About</h2>
  <p>Ten years of shipping products for small teams.</p>
</section>
<footer class="footer"><p>© 2026 Jordan Lee</p></footer>
"##;

const BLOG: &str = r##"<nav class="navbar">
  <span class="brand">Field Notes</span>
  <div class="nav-links"><a href="#">Home</a><a href="#archive">Archive</a></div>
</nav>
<main class="container">
  <article>
    <h1>Notes on building in public</h1>
    <p class="meta">March 3, 2026</p>
    <p>Writing down what you learn is the cheapest way to learn it twice.</p>
  </article>
  <article>
    <h2>Small tools, sharp edges</h2>
    <p class="meta">February 17, 2026</p>
    <p>Every tool should do one thing and admit what it cannot do.</p>
  </article>
</main>
<footer class="footer" id="archive"><p>© 2026 Field Notes</p></footer>
"##;
