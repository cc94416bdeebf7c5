//! Inline marks and block kinds.

/// An inline formatting mark.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mark {
    Bold,
    Italic,
    Underline,
    Strike,
    Code,
}

impl Mark {
    pub const ALL: [Self; 5] = [
        Self::Bold,
        Self::Italic,
        Self::Underline,
        Self::Strike,
        Self::Code,
    ];

    /// Marks that have a sticky toolbar mode.
    pub const STICKY: [Self; 3] = [Self::Bold, Self::Italic, Self::Underline];

    const fn bit(self) -> u8 {
        match self {
            Self::Bold => 1,
            Self::Italic => 1 << 1,
            Self::Underline => 1 << 2,
            Self::Strike => 1 << 3,
            Self::Code => 1 << 4,
        }
    }
}

/// A small set of [`Mark`]s.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct MarkSet(u8);

impl MarkSet {
    pub const EMPTY: Self = Self(0);

    pub const fn contains(self, mark: Mark) -> bool {
        self.0 & mark.bit() != 0
    }

    #[must_use]
    pub const fn with(self, mark: Mark) -> Self {
        Self(self.0 | mark.bit())
    }

    #[must_use]
    pub const fn without(self, mark: Mark) -> Self {
        Self(self.0 & !mark.bit())
    }

    #[must_use]
    pub const fn intersect(self, other: Self) -> Self {
        Self(self.0 & other.0)
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn iter(self) -> impl Iterator<Item = Mark> {
        Mark::ALL.into_iter().filter(move |m| self.contains(*m))
    }
}

impl FromIterator<Mark> for MarkSet {
    fn from_iter<I: IntoIterator<Item = Mark>>(iter: I) -> Self {
        iter.into_iter().fold(Self::EMPTY, Self::with)
    }
}

/// Block-level formatting of a single editor line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BlockKind {
    #[default]
    Paragraph,
    Heading1,
    Heading2,
    BulletItem,
    OrderedItem,
    Quote,
    CodeBlock,
}

impl BlockKind {
    /// Kind given to the new line when Enter splits a line of this kind.
    pub const fn continuation(self) -> Self {
        match self {
            Self::Heading1 | Self::Heading2 => Self::Paragraph,
            other => other,
        }
    }

    /// Whether Enter on an empty line of this kind turns it back into a paragraph.
    pub const fn exits_on_empty_enter(self) -> bool {
        matches!(self, Self::BulletItem | Self::OrderedItem | Self::Quote)
    }

    /// Whether inline marks are allowed in this block.
    pub const fn allows_marks(self) -> bool {
        !matches!(self, Self::CodeBlock)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mark_set_insert_and_remove() {
        let set = MarkSet::EMPTY.with(Mark::Bold).with(Mark::Underline);
        assert!(set.contains(Mark::Bold));
        assert!(set.contains(Mark::Underline));
        assert!(!set.contains(Mark::Italic));

        let set = set.without(Mark::Bold);
        assert!(!set.contains(Mark::Bold));
        assert_eq!(set.iter().collect::<Vec<_>>(), vec![Mark::Underline]);
    }

    #[test]
    fn test_mark_set_from_iter() {
        let set: MarkSet = [Mark::Italic, Mark::Code].into_iter().collect();
        assert!(set.contains(Mark::Italic));
        assert!(set.contains(Mark::Code));
        assert!(!set.is_empty());
    }

    #[test]
    fn test_heading_continues_as_paragraph() {
        assert_eq!(BlockKind::Heading1.continuation(), BlockKind::Paragraph);
        assert_eq!(BlockKind::BulletItem.continuation(), BlockKind::BulletItem);
    }
}
