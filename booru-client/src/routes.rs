//! Logical API operations and the static table translating them to each dialect's literal path.
use booru_common::Dialect;
use std::fmt::Display;
use std::str::FromStr;

use crate::error::ApiError;
use crate::request::HttpMethod;

/// Placeholder substituted with the resource id in paths that address a single resource.
pub const ID_PLACEHOLDER: &str = "{id}";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Route {
    PostList,
    PostShow,
    PostCreate,
    PostUpdate,
    PostDestroy,
    PostRevertTags,
    PostVote,
    TagList,
    TagUpdate,
    TagRelated,
    ArtistList,
    ArtistCreate,
    ArtistUpdate,
    ArtistDestroy,
    CommentList,
    CommentShow,
    CommentCreate,
    CommentDestroy,
    WikiList,
    WikiCreate,
    WikiUpdate,
    WikiShow,
    WikiDestroy,
    WikiLock,
    WikiUnlock,
    WikiRevert,
    WikiHistory,
    NoteList,
    NoteSearch,
    NoteHistory,
    NoteRevert,
    NoteCreateUpdate,
    UserSearch,
    ForumList,
    PoolList,
    PoolPosts,
    PoolUpdate,
    PoolCreate,
    PoolDestroy,
    PoolAddPost,
    PoolRemovePost,
    FavoriteListUsers,
    FavoriteAdd,
    FavoriteRemove,
    Profile,
}

/// Where and how a route is reached on one dialect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Endpoint {
    pub path: &'static str,
    pub method: HttpMethod,
    pub requires_auth: bool,
}

const fn read(path: &'static str) -> Option<Endpoint> {
    Some(Endpoint {
        path,
        method: HttpMethod::Get,
        requires_auth: false,
    })
}

const fn write(path: &'static str, method: HttpMethod) -> Option<Endpoint> {
    Some(Endpoint {
        path,
        method,
        requires_auth: true,
    })
}

impl Route {
    pub const ALL: [Self; 45] = [
        Self::PostList,
        Self::PostShow,
        Self::PostCreate,
        Self::PostUpdate,
        Self::PostDestroy,
        Self::PostRevertTags,
        Self::PostVote,
        Self::TagList,
        Self::TagUpdate,
        Self::TagRelated,
        Self::ArtistList,
        Self::ArtistCreate,
        Self::ArtistUpdate,
        Self::ArtistDestroy,
        Self::CommentList,
        Self::CommentShow,
        Self::CommentCreate,
        Self::CommentDestroy,
        Self::WikiList,
        Self::WikiCreate,
        Self::WikiUpdate,
        Self::WikiShow,
        Self::WikiDestroy,
        Self::WikiLock,
        Self::WikiUnlock,
        Self::WikiRevert,
        Self::WikiHistory,
        Self::NoteList,
        Self::NoteSearch,
        Self::NoteHistory,
        Self::NoteRevert,
        Self::NoteCreateUpdate,
        Self::UserSearch,
        Self::ForumList,
        Self::PoolList,
        Self::PoolPosts,
        Self::PoolUpdate,
        Self::PoolCreate,
        Self::PoolDestroy,
        Self::PoolAddPost,
        Self::PoolRemovePost,
        Self::FavoriteListUsers,
        Self::FavoriteAdd,
        Self::FavoriteRemove,
        Self::Profile,
    ];

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::PostList => "post_list",
            Self::PostShow => "post_show",
            Self::PostCreate => "post_create",
            Self::PostUpdate => "post_update",
            Self::PostDestroy => "post_destroy",
            Self::PostRevertTags => "post_revert_tags",
            Self::PostVote => "post_vote",
            Self::TagList => "tag_list",
            Self::TagUpdate => "tag_update",
            Self::TagRelated => "tag_related",
            Self::ArtistList => "artist_list",
            Self::ArtistCreate => "artist_create",
            Self::ArtistUpdate => "artist_update",
            Self::ArtistDestroy => "artist_destroy",
            Self::CommentList => "comment_list",
            Self::CommentShow => "comment_show",
            Self::CommentCreate => "comment_create",
            Self::CommentDestroy => "comment_destroy",
            Self::WikiList => "wiki_list",
            Self::WikiCreate => "wiki_create",
            Self::WikiUpdate => "wiki_update",
            Self::WikiShow => "wiki_show",
            Self::WikiDestroy => "wiki_destroy",
            Self::WikiLock => "wiki_lock",
            Self::WikiUnlock => "wiki_unlock",
            Self::WikiRevert => "wiki_revert",
            Self::WikiHistory => "wiki_history",
            Self::NoteList => "note_list",
            Self::NoteSearch => "note_search",
            Self::NoteHistory => "note_history",
            Self::NoteRevert => "note_revert",
            Self::NoteCreateUpdate => "note_create_update",
            Self::UserSearch => "user_search",
            Self::ForumList => "forum_list",
            Self::PoolList => "pool_list",
            Self::PoolPosts => "pool_posts",
            Self::PoolUpdate => "pool_update",
            Self::PoolCreate => "pool_create",
            Self::PoolDestroy => "pool_destroy",
            Self::PoolAddPost => "pool_add_post",
            Self::PoolRemovePost => "pool_remove_post",
            Self::FavoriteListUsers => "favorite_list_users",
            Self::FavoriteAdd => "favorite_add",
            Self::FavoriteRemove => "favorite_remove",
            Self::Profile => "profile",
        }
    }

    /// Looks the route up in the dialect's table. `None` means the dialect has no such route.
    #[must_use]
    pub const fn endpoint(self, dialect: Dialect) -> Option<Endpoint> {
        match dialect {
            Dialect::Danbooru => self.danbooru(),
            Dialect::Moebooru => self.moebooru(),
            Dialect::E621 => self.e621(),
            Dialect::Gelbooru => self.gelbooru(),
        }
    }

    /// Same as [`endpoint`](Self::endpoint), failing with
    /// [`UnsupportedOperation`](ApiError::UnsupportedOperation) for missing routes.
    ///
    /// # Errors
    /// See above.
    pub fn require_endpoint(self, dialect: Dialect) -> Result<Endpoint, ApiError> {
        self.endpoint(dialect)
            .ok_or_else(|| ApiError::UnsupportedOperation {
                route: self.name().to_string(),
                dialect,
            })
    }

    const fn danbooru(self) -> Option<Endpoint> {
        match self {
            Self::PostList => read("posts.json"),
            Self::PostShow => read("posts/{id}.json"),
            Self::PostVote => write("posts/{id}/votes.json", HttpMethod::Post),
            Self::TagList => read("tags.json"),
            Self::ArtistList => read("artists.json"),
            Self::CommentList => read("comments.json"),
            Self::WikiList => read("wiki_pages.json"),
            Self::PoolList => read("pools.json"),
            Self::PoolPosts => read("pools/{id}.json"),
            Self::FavoriteAdd => write("favorites.json", HttpMethod::Post),
            Self::FavoriteRemove => write("favorites/{id}.json", HttpMethod::Delete),
            Self::Profile => Some(Endpoint {
                path: "profile.json",
                method: HttpMethod::Get,
                requires_auth: true,
            }),
            _ => None,
        }
    }

    const fn e621(self) -> Option<Endpoint> {
        match self {
            Self::PostList => read("posts.json"),
            Self::PostShow => read("posts/{id}.json"),
            Self::TagList => read("tags.json"),
            Self::ArtistList => read("artists.json"),
            Self::WikiList => read("wiki_pages.json"),
            Self::PoolList => read("pools.json"),
            _ => None,
        }
    }

    const fn gelbooru(self) -> Option<Endpoint> {
        match self {
            Self::PostList => read("post"),
            Self::TagList => read("tag"),
            Self::CommentList => read("comment"),
            _ => None,
        }
    }

    const fn moebooru(self) -> Option<Endpoint> {
        match self {
            Self::PostList => read("post"),
            Self::PostCreate => write("post/create", HttpMethod::Post),
            Self::PostUpdate => write("post/update", HttpMethod::Put),
            Self::PostDestroy => write("post/destroy", HttpMethod::Delete),
            Self::PostRevertTags => write("post/revert_tags", HttpMethod::Put),
            Self::PostVote => write("post/vote", HttpMethod::Post),
            Self::TagList => read("tag"),
            Self::TagUpdate => write("tag/update", HttpMethod::Put),
            Self::TagRelated => read("tag/related"),
            Self::ArtistList => read("artist"),
            Self::ArtistCreate => write("artist/create", HttpMethod::Post),
            Self::ArtistUpdate => write("artist/update", HttpMethod::Put),
            Self::ArtistDestroy => write("artist/destroy", HttpMethod::Post),
            Self::CommentShow => read("comment/show"),
            Self::CommentCreate => write("comment/create", HttpMethod::Post),
            Self::CommentDestroy => write("comment/destroy", HttpMethod::Delete),
            Self::WikiList => read("wiki"),
            Self::WikiCreate => write("wiki/create", HttpMethod::Post),
            Self::WikiUpdate => write("wiki/update", HttpMethod::Put),
            Self::WikiShow => read("wiki/show"),
            Self::WikiDestroy => write("wiki/destroy", HttpMethod::Delete),
            Self::WikiLock => write("wiki/lock", HttpMethod::Post),
            Self::WikiUnlock => write("wiki/unlock", HttpMethod::Post),
            Self::WikiRevert => write("wiki/revert", HttpMethod::Put),
            Self::WikiHistory => read("wiki/history"),
            Self::NoteList => read("note"),
            Self::NoteSearch => read("note/search"),
            Self::NoteHistory => read("note/history"),
            Self::NoteRevert => write("note/revert", HttpMethod::Put),
            Self::NoteCreateUpdate => write("note/update", HttpMethod::Post),
            Self::UserSearch => read("user"),
            Self::ForumList => read("forum"),
            Self::PoolList => read("pool"),
            Self::PoolPosts => read("pool/show"),
            Self::PoolUpdate => write("pool/update", HttpMethod::Put),
            Self::PoolCreate => write("pool/create", HttpMethod::Post),
            Self::PoolDestroy => write("pool/destroy", HttpMethod::Delete),
            Self::PoolAddPost => write("pool/add_post", HttpMethod::Put),
            Self::PoolRemovePost => write("pool/remove_post", HttpMethod::Put),
            Self::FavoriteListUsers => read("favorite/list_users"),
            _ => None,
        }
    }
}

impl Display for Route {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for Route {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|route| route.name() == s)
            .ok_or_else(|| ApiError::invalid_param(format!("Unknown route '{s}'")))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn names_parse_back() {
        for route in Route::ALL {
            assert_eq!(route.name().parse::<Route>().unwrap(), route);
        }
        assert!("posts_everything".parse::<Route>().is_err());
    }

    #[test]
    fn post_list_path_differs_per_dialect() {
        let path = |d| Route::PostList.endpoint(d).map(|e| e.path);
        assert_eq!(path(Dialect::Danbooru), Some("posts.json"));
        assert_eq!(path(Dialect::E621), Some("posts.json"));
        assert_eq!(path(Dialect::Moebooru), Some("post"));
        assert_eq!(path(Dialect::Gelbooru), Some("post"));
    }

    #[test]
    fn read_only_dialects_only_expose_get_routes() {
        for dialect in [Dialect::E621, Dialect::Gelbooru] {
            for route in Route::ALL {
                if let Some(endpoint) = route.endpoint(dialect) {
                    assert_eq!(endpoint.method, HttpMethod::Get, "{route} on {dialect}");
                }
            }
        }
    }

    #[test]
    fn every_mutating_route_requires_auth() {
        for dialect in [Dialect::Danbooru, Dialect::Moebooru] {
            for route in Route::ALL {
                if let Some(endpoint) = route.endpoint(dialect) {
                    if endpoint.method.is_mutating() {
                        assert!(endpoint.requires_auth, "{route} on {dialect}");
                    }
                }
            }
        }
    }

    #[test]
    fn missing_routes_are_unsupported() {
        let err = Route::PostCreate
            .require_endpoint(Dialect::Gelbooru)
            .unwrap_err();
        assert!(matches!(
            err,
            ApiError::UnsupportedOperation {
                dialect: Dialect::Gelbooru,
                ..
            }
        ));
    }
}
