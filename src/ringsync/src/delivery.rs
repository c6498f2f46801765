use std::fmt;

use indicatif::{ProgressBar, ProgressStyle};
use ringsync_types::{FieldValue, Observation};
use tokio_util::sync::CancellationToken;

use crate::{DeliveryError, MetricSink, SinkPoint, SinkValue};

#[derive(Debug)]
pub enum PointOutcome {
    Written,
    Failed(DeliveryError),
}

impl PointOutcome {
    pub fn is_written(&self) -> bool {
        matches!(self, Self::Written)
    }
}

/// Per-point results of one delivery, in input order. A cancelled
/// delivery holds outcomes only for the points attempted before it
/// stopped.
#[derive(Debug, Default)]
pub struct DeliveryReport {
    pub outcomes: Vec<PointOutcome>,
    pub cancelled: bool,
}

impl DeliveryReport {
    pub fn attempted(&self) -> usize {
        self.outcomes.len()
    }

    pub fn written(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_written()).count()
    }

    pub fn failed(&self) -> usize {
        self.attempted() - self.written()
    }
}

impl fmt::Display for DeliveryReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Delivered {} of {} points ({} failed)",
            self.written(),
            self.attempted(),
            self.failed()
        )?;
        if self.cancelled {
            write!(f, ", cancelled")?;
        }
        Ok(())
    }
}

fn bar_style() -> ProgressStyle {
    ProgressStyle::with_template("{prefix:>12} [{wide_bar:.cyan/dim}] {pos}/{len} ({elapsed}, {eta} remaining)")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("=>-")
}

fn failure_message(idx: usize, point: &str, error: &DeliveryError) -> String {
    format!("Failed to write point {idx} ({point}): {error}")
}

/// Writes observations to a sink one point at a time. A failed point is
/// logged and recorded; it never stops the points after it.
pub struct Delivery<S> {
    sink: S,
    measurement: String,
}

impl<S: MetricSink> Delivery<S> {
    pub fn new(sink: S, measurement: impl Into<String>) -> Self {
        Self {
            sink,
            measurement: measurement.into(),
        }
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Builds the sink point for `observation`. Values the sink cannot
    /// represent are dropped with a warning.
    pub fn translate(&self, observation: &Observation) -> Result<SinkPoint, DeliveryError> {
        let fields = observation
            .fields()
            .iter()
            .filter_map(|(key, value)| {
                let value = match value {
                    FieldValue::Integer(v) => SinkValue::Integer(*v),
                    FieldValue::Float(v) if v.is_finite() => SinkValue::Float(*v),
                    FieldValue::Text(v) => SinkValue::Text(v.clone()),
                    FieldValue::Float(_) | FieldValue::Boolean(_) => {
                        warn!("Skipping field {key}={value}: unsupported value");
                        return None;
                    }
                };
                Some((key.clone(), value))
            })
            .collect::<Vec<_>>();

        if fields.is_empty() {
            return Err(DeliveryError::NoFields);
        }

        let tags = observation
            .tags()
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();

        Ok(SinkPoint {
            measurement: self.measurement.clone(),
            tags,
            fields,
            timestamp: observation.timestamp(),
        })
    }

    pub async fn deliver(
        &self,
        observations: &[Observation],
        cancel: &CancellationToken,
    ) -> DeliveryReport {
        let mut report = DeliveryReport::default();

        let pb = ProgressBar::new(observations.len() as u64);
        pb.set_style(bar_style());
        pb.set_prefix("delivering");

        for (idx, observation) in observations.iter().enumerate() {
            if cancel.is_cancelled() {
                report.cancelled = true;
                break;
            }

            let outcome = match self.translate(observation) {
                Ok(point) => match self.sink.write(&point).await {
                    Ok(()) => {
                        pb.suspend(|| debug!("Successfully wrote point {idx}"));
                        PointOutcome::Written
                    }
                    Err(error) => {
                        let line = point.to_line_protocol();
                        pb.suspend(|| error!("{}", failure_message(idx, &line, &error)));
                        PointOutcome::Failed(error)
                    }
                },
                Err(error) => {
                    let rendered = observation.to_string();
                    pb.suspend(|| error!("{}", failure_message(idx, &rendered, &error)));
                    PointOutcome::Failed(error)
                }
            };
            report.outcomes.push(outcome);
            pb.inc(1);
        }

        if report.cancelled {
            pb.abandon();
        } else {
            pb.finish();
        }
        report
    }
}
