use std::sync::OnceLock;

use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

use crate::core::config::Settings;

static RECORDER: OnceLock<PrometheusHandle> = OnceLock::new();

/// Installs the Prometheus recorder once per process. When the exporter is
/// disabled nothing is installed and the recording macros stay no-ops.
pub(crate) fn init(settings: &Settings) -> anyhow::Result<()> {
    if !settings.telemetry().prometheus_enabled || RECORDER.get().is_some() {
        return Ok(());
    }

    let handle = PrometheusBuilder::new().install_recorder()?;
    let _ = RECORDER.set(handle);
    Ok(())
}

pub(crate) fn render() -> Option<String> {
    RECORDER.get().map(PrometheusHandle::render)
}
