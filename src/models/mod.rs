mod article;
mod engagement;
mod feed;
mod user;
mod vote;

pub use article::*;
pub use engagement::*;
pub use feed::*;
pub use user::*;
pub use vote::*;
