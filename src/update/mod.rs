//! Update notice: lifecycle, input guard and progress formatting

pub mod controller;
pub mod guard;
pub mod info;
pub mod progress;
pub mod state;
pub mod view;

pub use controller::{LifecycleEvent, UpdateLifecycleController};
pub use guard::{InputEvent, InputKind, ModalInputGuard, NoticePart, NoticeRegion, Origin, Verdict};
pub use info::{CheckResponse, ProgressSample, UNKNOWN_VERSION, UpdateInfo, version_is_newer};
pub use progress::{ProgressDisplay, report};
pub use state::{ActionControl, ActionKind, ActionPhase, LifecycleState, Notice};
pub use view::{ActionsView, ButtonView, NoticeView, ProgressView, project};
