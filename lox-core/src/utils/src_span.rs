use std::fmt::Display;

/// Byte range of a construct in the source text.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SrcSpan {
    pub start: u32,
    pub end: u32,
}

impl SrcSpan {
	pub fn from(start: u32, end: u32) -> Self {
		Self { start, end }
	}

	/// Span covering both `self` and `other`.
	pub fn to(self, other: SrcSpan) -> Self {
		Self {
			start: self.start.min(other.start),
			end: self.end.max(other.end),
		}
	}

	/// 1-based line of `start` within `src`.
	pub fn line_in(&self, src: &str) -> u32 {
		let start = (self.start as usize).min(src.len());

		src.as_bytes()[..start].iter().filter(|byte| **byte == b'\n').count() as u32 + 1
	}
}

impl Display for SrcSpan {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}..{}", self.start, self.end)
	}
}
