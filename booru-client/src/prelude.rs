pub use crate::api::ApiParams;

#[cfg(feature = "danbooru")]
pub use crate::api::{danbooru, DanbooruApi};
#[cfg(feature = "e621")]
pub use crate::api::{e621, E621Api};
#[cfg(feature = "gelbooru")]
pub use crate::api::{gelbooru, GelbooruApi};
#[cfg(feature = "moebooru")]
pub use crate::api::{moebooru, MoebooruApi};

pub use crate::client::{BooruClient, ClientBuilder};
pub use crate::error::ApiError;
pub use crate::request::{FileUpload, Params};
pub use crate::routes::Route;
pub use crate::transport::Transport;
pub use booru_common::{Dialect, ResponseFormat};
