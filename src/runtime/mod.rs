use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crossterm::execute;
use crossterm::terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode};
use ratatui::{Terminal, backend::CrosstermBackend};

use crate::app::App;
use crate::config::{self, default_map_output};
use crate::library::{SortMode, sample_store};
use crate::map::{HtmlMapSurface, MapHandle, MapSurface, NullSurface};
use crate::metadata::{ExifMetadata, MetadataSource, NoMetadata};
use crate::ui::Theme;

mod event_loop;
mod logging;
mod settings;

/// Directory the sample records are rooted at.
fn sample_base() -> PathBuf {
    env::current_exe()
        .ok()
        .and_then(|p| p.parent().map(Path::to_path_buf))
        .or_else(|| env::current_dir().ok())
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Pick the map surface from `[map]` settings; also returns where the page goes.
fn map_surface(settings: &config::MapSettings) -> (Box<dyn MapSurface>, Option<PathBuf>) {
    if !settings.enabled {
        return (Box::new(NullSurface), None);
    }
    match settings.output.clone().or_else(default_map_output) {
        Some(output) => (
            Box::new(HtmlMapSurface::new(
                output.clone(),
                settings.tile_url.clone(),
                settings.focus_zoom,
            )),
            Some(output),
        ),
        None => {
            tracing::warn!("no map output path available, map disabled");
            (Box::new(NullSurface), None)
        }
    }
}

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let (settings, config_warning) = settings::load_settings();
    let log_file = logging::init(&settings.log);
    if let Some(msg) = config_warning {
        tracing::warn!("{msg}");
    }
    tracing::info!(log_file = ?log_file, "photomap starting");

    let theme = Theme::from_settings(&settings.ui.theme).unwrap_or_default();
    let metadata: Box<dyn MetadataSource> = if settings.library.read_exif {
        Box::new(ExifMetadata)
    } else {
        Box::new(NoMetadata)
    };

    let mut app = App::new(
        sample_store(&sample_base()),
        SortMode::from(settings.sort.default_mode),
    );
    app.set_status_ttl(Duration::from_millis(settings.ui.status_ms));
    app.set_preview_size(settings.preview.width, settings.preview.height);

    let (surface, map_output) = map_surface(&settings.map);
    let map = MapHandle::spawn(surface);
    app.map_target = map_output.map(|p| p.display().to_string());
    app.set_map_sender(map.sender());

    if let Some(dir) = env::args().nth(1) {
        // A failed scan keeps the sample data and leaves a notice in the status bar.
        let _ = app.open_directory(Path::new(&dir), &settings.library, metadata.as_ref());
    }

    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let run_result: Result<(), Box<dyn std::error::Error>> = (|| {
        let mut state = event_loop::EventLoopState::default();
        event_loop::run(
            &mut terminal,
            &settings,
            &theme,
            &mut app,
            metadata.as_ref(),
            &mut state,
        )
    })();

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    map.shutdown();
    tracing::info!("photomap stopped");
    run_result
}
