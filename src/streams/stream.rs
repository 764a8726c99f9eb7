use crate::core::Observation;
use std::io::{Error, ErrorKind};

/// Pull-based source of observations.
///
/// Implementations may represent finite recordings (e.g., files) or unbounded
/// generators. A producer reports what it read; deciding whether a reading is
/// usable is left to the scorer, so malformed or missing readings are yielded
/// as [`Observation`] variants rather than swallowed.
pub trait ObservationStream {
    /// Indicates whether the stream *may* produce more observations.
    ///
    /// Unbounded generators return `true` always. If this returns `false`, a
    /// subsequent call to [`next_observation`] must return `None`.
    ///
    /// [`next_observation`]: ObservationStream::next_observation
    fn has_more_observations(&self) -> bool;

    /// Produces the next observation, or `None` once the stream is exhausted.
    ///
    /// End of stream is not an error and must not panic.
    fn next_observation(&mut self) -> Option<Observation>;

    /// Resets the stream to its initial state.
    ///
    /// Generators re-seed their RNG; file streams reopen their source. The
    /// driver never calls this, so sources that cannot rewind keep the
    /// default, which refuses.
    fn restart(&mut self) -> Result<(), Error> {
        Err(Error::new(
            ErrorKind::Unsupported,
            "stream cannot be restarted",
        ))
    }

    /// Short name used in logs.
    fn name(&self) -> &str;
}

impl<S: ObservationStream + ?Sized> ObservationStream for Box<S> {
    fn has_more_observations(&self) -> bool {
        (**self).has_more_observations()
    }

    fn next_observation(&mut self) -> Option<Observation> {
        (**self).next_observation()
    }

    fn restart(&mut self) -> Result<(), Error> {
        (**self).restart()
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}
