//! Domain logic - pure value types independent of git and the filesystem

pub mod branch;
pub mod commit;
pub mod prerelease;
pub mod release_type;
pub mod tag;

pub use branch::{AllowedBranch, BranchContext, BranchPolicy};
pub use commit::{ChangeKind, ParsedCommit};
pub use prerelease::{identifier_of, next_identifier, slugify_branch};
pub use release_type::ReleaseType;
pub use tag::{format_tag, strip_tag_prefix, Tag};
