//! The `Source` value attached to every node.

use super::{Comment, Span};

/// Where a node came from, plus the comments attached around it.
///
/// `preceding_comments` were scanned before the node's first character,
/// `following_comments` after its last one. The parser partitions every
/// comment into exactly one of these lists (or a node-specific slot).
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Source {
    pub span: Span,
    pub preceding_comments: Vec<Comment>,
    pub following_comments: Vec<Comment>,
}

impl Source {
    #[inline]
    pub fn new(span: Span) -> Self {
        Source {
            span,
            preceding_comments: Vec::new(),
            following_comments: Vec::new(),
        }
    }

    #[inline]
    pub fn from_range(start: u32, end: u32) -> Self {
        Source::new(Span::new(start, end))
    }

    #[must_use]
    pub fn with_preceding(mut self, comments: Vec<Comment>) -> Self {
        if self.preceding_comments.is_empty() {
            self.preceding_comments = comments;
        } else {
            let mut all = comments;
            all.append(&mut self.preceding_comments);
            self.preceding_comments = all;
        }
        self
    }

    #[must_use]
    pub fn with_following(mut self, mut comments: Vec<Comment>) -> Self {
        self.following_comments.append(&mut comments);
        self
    }

    #[inline]
    pub fn start(&self) -> u32 {
        self.span.start
    }

    #[inline]
    pub fn stop(&self) -> u32 {
        self.span.end
    }

    pub fn has_comments(&self) -> bool {
        !self.preceding_comments.is_empty() || !self.following_comments.is_empty()
    }
}
