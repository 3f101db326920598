/// Errors surfaced by the validated decoding paths.
///
/// The unchecked accessors never produce these; they clamp every access to the
/// buffer end and return zero values instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum OscError {
    /// A NUL terminator scan exhausted the bounded region.
    #[error("unterminated {region} (no NUL before offset {end})")]
    Unterminated { region: &'static str, end: usize },

    /// A computed offset or size would pass the buffer end.
    #[error("range {offset}+{len} exceeds buffer end {end}")]
    OutOfBounds {
        offset: usize,
        len: usize,
        end: usize,
    },
}

pub type Result<T> = std::result::Result<T, OscError>;
