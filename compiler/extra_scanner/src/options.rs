//! Context options pushed on the scanner while a construct is being parsed.

use bitflags::bitflags;

bitflags! {
    /// Grammar switches that depend on the enclosing construct.
    ///
    /// The scanner keeps a stack of these; nested constructs push a modified
    /// copy and pop it when they close.
    #[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
    pub struct ScanOptions: u16 {
        /// Right-hand side of `|>`/`?|>`: `#` is the piped value.
        const IN_PIPE = 1 << 0;
        /// Inside a view element: `<` may open a child element.
        const IN_VIEW = 1 << 1;
        /// A newline ends the current item unless the next line continues it.
        const NEWLINE_IS_SEPARATOR = 1 << 2;
        /// `...expr` spreads are legal at the start of an item.
        const ALLOW_SPLAT = 1 << 3;
        /// `item if cond` inclusion suffixes are legal.
        const ALLOW_INCLUSION = 1 << 4;
        /// `f(x) {…}` and `f(x): …` block arguments are not recognised.
        const NO_BLOCK_ARGS = 1 << 5;
        /// Only postfix continuations (`.`, `?.`, call, index) may follow an
        /// operand: argument types, view property values.
        const SINGLE_EXPRESSION = 1 << 6;
        /// `*expr` keyword-argument lists are legal at the start of an item
        /// (call arguments only).
        const ALLOW_KWARGS = 1 << 7;
    }
}

impl ScanOptions {
    /// Options for the items of a bracketed list: newline-separated, with
    /// spreads and inclusions.
    pub const LIST_ITEMS: Self = Self::NEWLINE_IS_SEPARATOR
        .union(Self::ALLOW_SPLAT)
        .union(Self::ALLOW_INCLUSION);

    /// Options that only apply to the construct that set them and must not
    /// leak into nested sub-expressions.
    pub const ITEM_LOCAL: Self = Self::NEWLINE_IS_SEPARATOR
        .union(Self::ALLOW_SPLAT)
        .union(Self::ALLOW_INCLUSION)
        .union(Self::ALLOW_KWARGS)
        .union(Self::NO_BLOCK_ARGS)
        .union(Self::SINGLE_EXPRESSION);
}
