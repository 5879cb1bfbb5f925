pub mod docraptor;
pub mod print;
pub mod request;
pub mod storage;

pub use docraptor::*;
pub use print::*;
pub use request::*;
pub use storage::*;
