//! Formatting commands for the rich-text editor
//!
//! Commands are best-effort toolbar actions. They never fail loudly: when
//! the editor is missing, nothing is selected, or the caret sits inside a
//! code or quote block, they simply report `false`.

use std::collections::HashSet;
use std::str::FromStr;

use super::markup::{code_block, quote_block, strip_markup, table_html};
use crate::error::{Result, TicketDeskError};

/// Position range of the current selection, in document order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectionRange {
    pub start: usize,
    pub end: usize,
}

impl SelectionRange {
    #[must_use]
    pub const fn new(start: usize, end: usize) -> Self {
        if start <= end {
            Self { start, end }
        } else {
            Self {
                start: end,
                end: start,
            }
        }
    }

    #[must_use]
    pub const fn is_collapsed(&self) -> bool {
        self.start == self.end
    }

    /// Whether the range touches `[start, end)`; a caret on a boundary counts
    #[must_use]
    pub const fn intersects(&self, start: usize, end: usize) -> bool {
        if self.is_collapsed() {
            return self.start >= start && self.start <= end;
        }
        self.start < end && self.end > start
    }
}

/// A table cell of the editable document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableCell {
    /// Stable identity of the cell node
    pub id: u64,
    pub start: usize,
    pub end: usize,
}

/// Native editing commands understood by the surface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NativeCommand {
    Bold,
    Italic,
    Underline,
    StrikeThrough,
    ForeColor,
    HiliteColor,
    InsertOrderedList,
    InsertUnorderedList,
    JustifyLeft,
    JustifyCenter,
    JustifyRight,
    JustifyFull,
    FormatBlock,
    InsertHtml,
    RemoveFormat,
    CreateLink,
    Unlink,
}

impl NativeCommand {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Bold => "bold",
            Self::Italic => "italic",
            Self::Underline => "underline",
            Self::StrikeThrough => "strikeThrough",
            Self::ForeColor => "foreColor",
            Self::HiliteColor => "hiliteColor",
            Self::InsertOrderedList => "insertOrderedList",
            Self::InsertUnorderedList => "insertUnorderedList",
            Self::JustifyLeft => "justifyLeft",
            Self::JustifyCenter => "justifyCenter",
            Self::JustifyRight => "justifyRight",
            Self::JustifyFull => "justifyFull",
            Self::FormatBlock => "formatBlock",
            Self::InsertHtml => "insertHTML",
            Self::RemoveFormat => "removeFormat",
            Self::CreateLink => "createLink",
            Self::Unlink => "unlink",
        }
    }
}

impl FromStr for NativeCommand {
    type Err = TicketDeskError;

    fn from_str(s: &str) -> Result<Self> {
        const ALL: [NativeCommand; 17] = [
            NativeCommand::Bold,
            NativeCommand::Italic,
            NativeCommand::Underline,
            NativeCommand::StrikeThrough,
            NativeCommand::ForeColor,
            NativeCommand::HiliteColor,
            NativeCommand::InsertOrderedList,
            NativeCommand::InsertUnorderedList,
            NativeCommand::JustifyLeft,
            NativeCommand::JustifyCenter,
            NativeCommand::JustifyRight,
            NativeCommand::JustifyFull,
            NativeCommand::FormatBlock,
            NativeCommand::InsertHtml,
            NativeCommand::RemoveFormat,
            NativeCommand::CreateLink,
            NativeCommand::Unlink,
        ];
        ALL.into_iter()
            .find(|cmd| cmd.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| TicketDeskError::InvalidInput(format!("Unknown editor command: '{s}'")))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListKind {
    Ordered,
    Unordered,
}

/// Block-level wrappers offered by the toolbar
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockTag {
    Paragraph,
    Heading(u8),
    Quote,
    Code,
}

impl BlockTag {
    /// Tag name passed to `formatBlock`
    #[must_use]
    pub fn tag_name(self) -> String {
        match self {
            Self::Paragraph => "p".to_string(),
            Self::Heading(level) => format!("h{}", level.clamp(1, 6)),
            Self::Quote => "blockquote".to_string(),
            Self::Code => "pre".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Alignment {
    Left,
    Center,
    Right,
    Justify,
}

impl Alignment {
    const fn command(self) -> NativeCommand {
        match self {
            Self::Left => NativeCommand::JustifyLeft,
            Self::Center => NativeCommand::JustifyCenter,
            Self::Right => NativeCommand::JustifyRight,
            Self::Justify => NativeCommand::JustifyFull,
        }
    }
}

/// The editable region the commands operate on
pub trait EditorSurface {
    /// Whether the editable root element is mounted
    fn has_root(&self) -> bool;

    fn focus(&mut self);

    /// Current selection inside the root, if any
    fn selection(&self) -> Option<SelectionRange>;

    /// Run a native command; returns whether the surface accepted it
    fn exec_native(&mut self, command: NativeCommand, value: Option<&str>) -> bool;

    /// Every table cell inside the root
    fn table_cells(&self) -> Vec<TableCell>;

    fn set_cell_background(&mut self, cell_id: u64, color: &str);

    /// Serialized markup of the selected fragment
    fn selected_html(&self) -> String;
}

type ZoneGuard<S> = Box<dyn Fn(&S, SelectionRange) -> bool + Send + Sync>;
type ToolbarCallback = Box<dyn FnMut() + Send>;

/// Toolbar actions bound to one editor surface
pub struct EditorCommands<S: EditorSurface> {
    surface: S,
    in_protected_zone: ZoneGuard<S>,
    on_change: ToolbarCallback,
}

impl<S: EditorSurface> EditorCommands<S> {
    /// `in_protected_zone` reports whether a selection lies in a code or quote block
    pub fn new<G, C>(surface: S, in_protected_zone: G, on_change: C) -> Self
    where
        G: Fn(&S, SelectionRange) -> bool + Send + Sync + 'static,
        C: FnMut() + Send + 'static,
    {
        Self {
            surface,
            in_protected_zone: Box::new(in_protected_zone),
            on_change: Box::new(on_change),
        }
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    /// Selection the commands may act on, if any
    fn editable_selection(&self) -> Option<SelectionRange> {
        if !self.surface.has_root() {
            return None;
        }
        let selection = self.surface.selection()?;
        if (self.in_protected_zone)(&self.surface, selection) {
            tracing::trace!("Selection is inside a protected block");
            return None;
        }
        Some(selection)
    }

    fn run<F>(&mut self, action: F) -> bool
    where
        F: FnOnce(&mut S, SelectionRange) -> bool,
    {
        let Some(selection) = self.editable_selection() else {
            return false;
        };
        self.surface.focus();
        let applied = action(&mut self.surface, selection);
        if applied {
            (self.on_change)();
        }
        applied
    }

    pub fn exec_command(&mut self, command: NativeCommand, value: Option<&str>) -> bool {
        self.run(|surface, _| surface.exec_native(command, value))
    }

    pub fn apply_color(&mut self, color: &str) -> bool {
        let color = color.trim();
        if color.is_empty() {
            return false;
        }
        self.exec_command(NativeCommand::ForeColor, Some(color))
    }

    /// Color the background of the selection
    ///
    /// Table cells touched by the selection get the color on the cell
    /// itself; otherwise the text is highlighted.
    pub fn apply_bg_color(&mut self, color: &str) -> bool {
        let color = color.trim();
        if color.is_empty() {
            return false;
        }
        self.run(|surface, selection| {
            let mut seen = HashSet::new();
            let cells: Vec<u64> = surface
                .table_cells()
                .into_iter()
                .filter(|cell| selection.intersects(cell.start, cell.end))
                .filter(|cell| seen.insert(cell.id))
                .map(|cell| cell.id)
                .collect();

            if cells.is_empty() {
                return surface.exec_native(NativeCommand::HiliteColor, Some(color));
            }
            for id in cells {
                surface.set_cell_background(id, color);
            }
            true
        })
    }

    pub fn insert_list(&mut self, kind: ListKind) -> bool {
        let command = match kind {
            ListKind::Ordered => NativeCommand::InsertOrderedList,
            ListKind::Unordered => NativeCommand::InsertUnorderedList,
        };
        self.exec_command(command, None)
    }

    /// Wrap the selection in a block
    ///
    /// Code and quote blocks receive the plain text of the selection so no
    /// inline styles leak into them.
    pub fn insert_block(&mut self, tag: BlockTag) -> bool {
        self.run(|surface, _| match tag {
            BlockTag::Code | BlockTag::Quote => {
                let text = strip_markup(&surface.selected_html());
                let html = if tag == BlockTag::Code {
                    code_block(&text)
                } else {
                    quote_block(&text)
                };
                surface.exec_native(NativeCommand::InsertHtml, Some(&html))
            },
            BlockTag::Paragraph | BlockTag::Heading(_) => {
                let name = tag.tag_name();
                surface.exec_native(NativeCommand::FormatBlock, Some(&name))
            },
        })
    }

    pub fn set_align(&mut self, alignment: Alignment) -> bool {
        self.exec_command(alignment.command(), None)
    }

    pub fn insert_table(&mut self, rows: usize, cols: usize) -> bool {
        if rows == 0 || cols == 0 {
            return false;
        }
        let html = table_html(rows, cols);
        self.exec_command(NativeCommand::InsertHtml, Some(&html))
    }
}
