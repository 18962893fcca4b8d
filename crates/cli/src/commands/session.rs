//! Series loading shared by the comparison commands.

use std::path::Path;

use anyhow::{Context, Result};
use contracts::SessionBlueprint;
use sync_engine::{ComparisonSession, DistanceAnalyzer};
use tracing::info;

/// Display name of a series file: its stem
pub fn series_name(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Load a series table into an analyzer, applying a distance offset
pub fn load_analyzer(path: &Path, name: &str, offset_m: f64) -> Result<DistanceAnalyzer> {
    let series = series_io::load_series(path)
        .with_context(|| format!("Failed to load series from {}", path.display()))?;
    observability::record_series_loaded(name, series.len());

    let mut analyzer = DistanceAnalyzer::new(name, series);
    if offset_m != 0.0 {
        analyzer.shift_distance(offset_m);
    }
    info!(
        series = %name,
        samples = analyzer.len(),
        offset_m,
        "Series loaded"
    );
    Ok(analyzer)
}

/// Session over every series listed in a blueprint
pub fn session_from_blueprint(blueprint: &SessionBlueprint) -> Result<ComparisonSession> {
    let mut session = ComparisonSession::new(&blueprint.analysis);
    for series in &blueprint.series {
        let analyzer = load_analyzer(&series.path, &series.name, series.offset_m)?
            .with_slope_window(blueprint.reconstruction.slope_window);
        session.add(analyzer)?;
    }
    Ok(session)
}

/// Session over series files named after their stems
pub fn session_from_paths(paths: &[impl AsRef<Path>]) -> Result<ComparisonSession> {
    let mut session = ComparisonSession::default();
    for path in paths {
        let path = path.as_ref();
        let analyzer = load_analyzer(path, &series_name(path), 0.0)?;
        session
            .add(analyzer)
            .with_context(|| format!("Cannot add {}", path.display()))?;
    }
    Ok(session)
}

pub fn load_blueprint(path: &Path) -> Result<SessionBlueprint> {
    if !path.exists() {
        anyhow::bail!("Session file not found: {}", path.display());
    }
    config_loader::ConfigLoader::load_from_path(path)
        .with_context(|| format!("Failed to load session from {}", path.display()))
}
