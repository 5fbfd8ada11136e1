//! Metrics recorder initialization.

use {anyhow::Result, tracing::info};

/// Configuration for the metrics system.
#[derive(Debug, Clone, Default)]
pub struct MetricsRecorderConfig {
    /// Whether metrics collection is enabled
    pub enabled: bool,
    /// Socket address for the Prometheus scrape endpoint
    pub listen: Option<std::net::SocketAddr>,
    /// Global labels to add to all metrics
    pub global_labels: Vec<(String, String)>,
}

/// Initialize the metrics system.
///
/// Call once at startup, inside the tokio runtime. With the `prometheus`
/// feature this installs the global recorder and an HTTP listener; without
/// it every metric is discarded.
///
/// # Errors
///
/// Returns an error if the exporter cannot be built or its listener bound.
pub fn init_metrics(config: MetricsRecorderConfig) -> Result<()> {
    if !config.enabled {
        info!("metrics collection is disabled");
        return Ok(());
    }

    #[cfg(feature = "prometheus")]
    {
        init_prometheus(&config)?;
        info!(listen = ?config.listen, "prometheus metrics exporter initialized");
        Ok(())
    }

    #[cfg(not(feature = "prometheus"))]
    {
        info!(global_labels = config.global_labels.len(), "metrics exporter not compiled in");
        Ok(())
    }
}

#[cfg(feature = "prometheus")]
fn init_prometheus(config: &MetricsRecorderConfig) -> Result<()> {
    use metrics_exporter_prometheus::{Matcher, PrometheusBuilder};

    let mut builder = PrometheusBuilder::new().set_buckets_for_metric(
        Matcher::Suffix("_duration_seconds".to_string()),
        crate::buckets::API_DURATION,
    )?;

    if let Some(addr) = config.listen {
        builder = builder.with_http_listener(addr);
    }

    for (key, value) in &config.global_labels {
        builder = builder.add_global_label(key, value);
    }

    builder.install()?;
    Ok(())
}
