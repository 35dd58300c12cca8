//! Tab shell for the analysis suite
//!
//! Every tab pairs a [`forms::Form`] with a gateway inside a [`tabs::Tab`]
//! state machine. The binary drives one tab per subcommand.

pub mod dates;
pub mod docs;
pub mod forms;
pub mod output;
pub mod tabs;

pub use forms::{Form, FormError};
pub use tabs::{SubmitOutcome, Tab, TabState};
