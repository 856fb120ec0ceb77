//! Built-in prop kinds.

pub mod db;
pub mod http;
pub mod string;
pub mod timer;

pub use db::Db;
pub use http::{Http, HttpResponse};
pub use string::{OptionsFn, StringOptions, StringProp};
pub use timer::{Schedule, Timer};
