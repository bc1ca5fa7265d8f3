//! Environment adapters implementing the domain ports.

pub mod arcade_sim;
pub mod paced;
pub mod scripted;
pub mod webdriver;

pub use arcade_sim::GridArcade;
pub use paced::PacedEnvironment;
pub use scripted::ScriptedEnvironment;
pub use webdriver::WebDriverEnvironment;
