//! Application model types: `App`, `InputMode` and `StatusMessage`.
//!
//! The `App` struct owns the current photo store together with every
//! projection derived from it (sort order, folder tree, visible rows) and
//! coordinates selection with the preview pane and the map worker.

use std::collections::HashSet;
use std::path::Path;
use std::sync::mpsc::Sender;
use std::time::{Duration, Instant};

use crate::config::LibrarySettings;
use crate::library::{PhotoRecord, PhotoStore, ScanError, SortMode, dir_label, scan, sorted_indices};
use crate::map::{MapCommand, build_feed};
use crate::metadata::MetadataSource;
use crate::preview::{ImageThumbnails, Preview, ThumbnailSource};
use crate::tree::{NodeId, PhotoTree, TreeRow, build_tree};

/// What keystrokes currently edit.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum InputMode {
    #[default]
    Browse,
    /// Typing a directory path to open.
    OpenPrompt,
}

/// A short-lived notice for the status bar.
#[derive(Clone, Debug)]
pub struct StatusMessage {
    pub text: String,
    pub expires_at: Instant,
}

/// The main application model.
pub struct App {
    pub store: PhotoStore,
    pub sort_mode: SortMode,
    /// Store indices in the current sort order.
    pub order: Vec<usize>,
    pub tree: PhotoTree,
    pub rows: Vec<TreeRow>,
    /// Position of the cursor within `rows`.
    pub cursor: usize,
    pub selected: Option<NodeId>,
    pub preview: Preview,
    pub status: Option<StatusMessage>,
    pub input_mode: InputMode,
    pub prompt: String,
    /// Where the map page is written, for display only.
    pub map_target: Option<String>,

    collapsed: HashSet<NodeId>,
    map_tx: Option<Sender<MapCommand>>,
    thumbnails: Box<dyn ThumbnailSource>,
    preview_size: (u32, u32),
    status_ttl: Duration,
}

impl App {
    /// Create a new `App` over `store`, projected with `sort_mode`.
    pub fn new(store: PhotoStore, sort_mode: SortMode) -> Self {
        let preview_size = (520, 320);
        let mut app = Self {
            tree: PhotoTree::empty(&store.root_label()),
            store,
            sort_mode,
            order: Vec::new(),
            rows: Vec::new(),
            cursor: 0,
            selected: None,
            preview: Preview::empty(preview_size.0, preview_size.1),
            status: None,
            input_mode: InputMode::Browse,
            prompt: String::new(),
            map_target: None,

            collapsed: HashSet::new(),
            map_tx: None,
            thumbnails: Box::new(ImageThumbnails),
            preview_size,
            status_ttl: Duration::from_millis(4000),
        };
        app.rebuild();
        app
    }

    /// Attach the map worker's command channel and push the current feed to it.
    pub fn set_map_sender(&mut self, tx: Sender<MapCommand>) {
        self.map_tx = Some(tx);
        self.push_feed();
        if let Some(photo) = self.preview.photo {
            self.send_map(MapCommand::CenterOn(photo));
        }
    }

    /// Replace the thumbnail decoder and re-render the current preview.
    pub fn set_thumbnail_source(&mut self, source: Box<dyn ThumbnailSource>) {
        self.thumbnails = source;
        self.refresh_preview();
    }

    /// Set the preview target size in pixels and re-render the preview.
    pub fn set_preview_size(&mut self, width: u32, height: u32) {
        self.preview_size = (width, height);
        self.refresh_preview();
    }

    /// How long status messages stay visible.
    pub fn set_status_ttl(&mut self, ttl: Duration) {
        self.status_ttl = ttl;
    }

    /// Show `text` in the status bar for the configured duration.
    pub fn set_status(&mut self, text: impl Into<String>) {
        self.status = Some(StatusMessage {
            text: text.into(),
            expires_at: Instant::now() + self.status_ttl,
        });
    }

    /// Status text that is still visible at `now`.
    pub fn active_status(&self, now: Instant) -> Option<&str> {
        self.status
            .as_ref()
            .filter(|s| now < s.expires_at)
            .map(|s| s.text.as_str())
    }

    /// Scan `dir` and, if it holds any photos, make it the current library.
    ///
    /// On failure the current store and all projections stay as they were and
    /// only a status notice is produced.
    pub fn open_directory(
        &mut self,
        dir: &Path,
        settings: &LibrarySettings,
        metadata: &dyn MetadataSource,
    ) -> Result<usize, ScanError> {
        match scan(dir, settings, metadata) {
            Ok(store) => {
                let count = store.len();
                let label = store.root_label();
                self.replace_store(store);
                self.set_status(format!("Loaded {count} photos from '{label}'"));
                Ok(count)
            }
            Err(e) => {
                tracing::warn!(error = %e, "directory not loaded");
                self.set_status(format!(
                    "No supported images found in '{}'",
                    dir_label(e.path())
                ));
                Err(e)
            }
        }
    }

    /// Swap in a whole new store and rebuild every projection from it.
    pub fn replace_store(&mut self, store: PhotoStore) {
        self.store = store;
        self.rebuild();
        self.push_feed();
        if let Some(photo) = self.preview.photo {
            self.send_map(MapCommand::CenterOn(photo));
        }
    }

    pub fn set_sort_mode(&mut self, mode: SortMode) {
        self.sort_mode = mode;
        self.rebuild();
        if let Some(photo) = self.preview.photo {
            self.send_map(MapCommand::CenterOn(photo));
        }
    }

    pub fn toggle_sort_mode(&mut self) {
        self.set_sort_mode(self.sort_mode.toggled());
    }

    /// Recompute order, tree and rows, then select the tree's default leaf.
    ///
    /// Map commands are left to the caller so a rebuild never talks to the
    /// map on its own.
    fn rebuild(&mut self) {
        self.order = sorted_indices(self.store.records(), self.sort_mode);
        self.tree = build_tree(&self.store, &self.order);
        self.collapsed.clear();
        self.refresh_rows();

        let target = self.tree.default_selection();
        self.cursor = target
            .and_then(|id| self.rows.iter().position(|r| r.id == id))
            .unwrap_or(0);
        self.selected = target;
        self.preview = self.preview_for(target);
    }

    fn refresh_rows(&mut self) {
        self.rows = self.tree.visible_rows(&self.collapsed);
    }

    fn refresh_preview(&mut self) {
        self.preview = self.preview_for(self.selected);
    }

    fn push_feed(&self) {
        self.send_map(MapCommand::LoadMarkers(build_feed(&self.store)));
    }

    fn send_map(&self, cmd: MapCommand) {
        if let Some(tx) = &self.map_tx {
            let _ = tx.send(cmd);
        }
    }

    /// Store index behind a tree node, if it is a leaf pointing into the store.
    pub fn resolve_selection(&self, node: Option<NodeId>) -> Option<usize> {
        node.and_then(|id| self.tree.node(id))
            .and_then(|n| n.photo_index())
            .filter(|&i| i < self.store.len())
    }

    fn preview_for(&self, node: Option<NodeId>) -> Preview {
        let (w, h) = self.preview_size;
        match self.resolve_selection(node) {
            Some(i) => Preview::for_record(i, &self.store.records()[i], self.thumbnails.as_ref(), w, h),
            None => Preview::empty(w, h),
        }
    }

    /// Handle a tree selection event.
    ///
    /// A leaf centers the map on its marker and previews its photo. Groups and
    /// anything that does not resolve to a record reset the preview and leave
    /// the map alone.
    pub fn select_node(&mut self, node: Option<NodeId>) {
        self.selected = node;
        match self.resolve_selection(node) {
            Some(i) => {
                self.send_map(MapCommand::CenterOn(i));
                self.preview = self.preview_for(node);
            }
            None => {
                let (w, h) = self.preview_size;
                self.preview = Preview::empty(w, h);
            }
        }
    }

    /// Record currently shown in the preview.
    pub fn selected_record(&self) -> Option<&PhotoRecord> {
        self.preview.photo.and_then(|i| self.store.get(i))
    }

    fn move_cursor_to(&mut self, pos: usize) {
        if self.rows.is_empty() {
            return;
        }
        let pos = pos.min(self.rows.len() - 1);
        if pos == self.cursor && self.selected == Some(self.rows[pos].id) {
            return;
        }
        self.cursor = pos;
        self.select_node(Some(self.rows[pos].id));
    }

    /// Move to the next visible row (no wrap).
    pub fn next(&mut self) {
        self.move_cursor_to(self.cursor.saturating_add(1));
    }

    /// Move to the previous visible row (no wrap).
    pub fn prev(&mut self) {
        self.move_cursor_to(self.cursor.saturating_sub(1));
    }

    pub fn first(&mut self) {
        self.move_cursor_to(0);
    }

    pub fn last(&mut self) {
        self.move_cursor_to(self.rows.len().saturating_sub(1));
    }

    fn current_node(&self) -> Option<NodeId> {
        self.rows.get(self.cursor).map(|r| r.id)
    }

    pub fn is_collapsed(&self, id: NodeId) -> bool {
        self.collapsed.contains(&id)
    }

    /// On a group: expand/collapse it. On a leaf: select it again, which
    /// re-centers the map.
    pub fn activate(&mut self) {
        let Some(id) = self.current_node() else {
            return;
        };
        let is_group = self.tree.node(id).is_some_and(|n| n.is_group());
        if is_group {
            if !self.collapsed.remove(&id) {
                self.collapsed.insert(id);
            }
            self.refresh_rows();
            self.cursor = self.rows.iter().position(|r| r.id == id).unwrap_or(0);
        } else {
            self.select_node(Some(id));
        }
    }

    /// Collapse the current group, or jump to the parent of a leaf or collapsed group.
    pub fn collapse_or_parent(&mut self) {
        let Some(id) = self.current_node() else {
            return;
        };
        let is_open_group =
            self.tree.node(id).is_some_and(|n| n.is_group()) && !self.collapsed.contains(&id);
        if is_open_group {
            self.collapsed.insert(id);
            self.refresh_rows();
            self.cursor = self.rows.iter().position(|r| r.id == id).unwrap_or(0);
        } else if let Some(parent) = self.tree.parent_of(id) {
            if let Some(pos) = self.rows.iter().position(|r| r.id == parent) {
                self.move_cursor_to(pos);
            }
        }
    }

    /// Start typing a directory path, pre-filled with the current root.
    pub fn enter_open_prompt(&mut self) {
        self.input_mode = InputMode::OpenPrompt;
        self.prompt = self.store.root().display().to_string();
    }

    pub fn cancel_open_prompt(&mut self) {
        self.input_mode = InputMode::Browse;
        self.prompt.clear();
    }

    pub fn push_prompt_char(&mut self, c: char) {
        self.prompt.push(c);
    }

    pub fn pop_prompt_char(&mut self) {
        self.prompt.pop();
    }

    /// Leave the prompt and open the typed directory. Blank input just closes the prompt.
    pub fn submit_open_prompt(
        &mut self,
        settings: &LibrarySettings,
        metadata: &dyn MetadataSource,
    ) -> Option<Result<usize, ScanError>> {
        let path = self.prompt.trim().to_string();
        self.cancel_open_prompt();
        if path.is_empty() {
            return None;
        }
        Some(self.open_directory(Path::new(&path), settings, metadata))
    }
}
