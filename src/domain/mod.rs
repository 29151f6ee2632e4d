//! Domain logic - pure version rules independent of git and the filesystem

pub mod intent;
pub mod prerelease;
pub mod tag;
pub mod transition;
pub mod validate;
pub mod version;

pub use intent::ReleaseIntent;
pub use prerelease::{PrereleaseTrack, TrackOrder};
pub use tag::Template;
pub use transition::{next_version, Transition, TransitionKind};
pub use validate::{validate, VersionReport};
pub use version::{Counter, Prerelease, SemanticVersion, VersionBump};
