use thiserror::Error;

/// Hard failures raised by [`Build::apply`](crate::build::Build::apply).
///
/// Soft failures (unrenderable hole values, unsupported attribute types,
/// surplus arguments) never surface here; they are logged and the affected
/// hole degrades to rendering nothing.
#[derive(Error, Debug)]
pub enum ApplyError {
	/// Fewer arguments were supplied than there are distinct slots.
	#[error("too few arguments: {required} slot(s) referenced but {supplied} value(s) supplied")]
	MissingArguments { required: usize, supplied: usize },
	/// A binding references a slot index with no corresponding argument.
	///
	/// Only reachable with hand-written markup whose slot indices are not
	/// consecutive; compiled markup always passes the count check above.
	#[error("no argument for slot {slot}")]
	MissingSlot { slot: usize },
	/// A binding signalled a genuine application failure.
	#[error("applying slot {slot} failed: {reason}")]
	Binding { slot: usize, reason: String },
}
