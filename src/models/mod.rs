mod pagination;
mod tag;
mod video;

pub use pagination::{PageQuery, Pagination, DEFAULT_PAGE, DEFAULT_PAGE_LIMIT};
pub use tag::{Tag, TagId, TagRecord};
pub use video::{NewVideo, UserId, Video, VideoId, VideoSummary};
