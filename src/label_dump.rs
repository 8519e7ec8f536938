use crate::layout::{LabelRequest, LabelResult, PlacementStrategy};
use serde::Serialize;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

/// Serializable summary of a batch of laid out labels, for debugging and
/// regression fixtures.
#[derive(Debug, Serialize)]
pub struct LabelDump {
    pub count: usize,
    pub drawn: usize,
    pub suppressed: usize,
    pub pushed_out: usize,
    pub labels: Vec<LabelEntryDump>,
}

#[derive(Debug, Serialize)]
pub struct LabelEntryDump {
    pub text: String,
    pub lines: Vec<String>,
    pub font_size: f32,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub fits: bool,
    pub strategy: String,
    pub inside_region: bool,
}

impl LabelDump {
    pub fn from_results(requests: &[LabelRequest], results: &[LabelResult]) -> Self {
        let labels: Vec<LabelEntryDump> = requests
            .iter()
            .zip(results)
            .map(|(request, result)| LabelEntryDump {
                text: request.text.clone(),
                lines: result.lines.clone(),
                font_size: result.font_size_px,
                x: result.x,
                y: result.y,
                width: result.width,
                height: result.height,
                fits: result.fits,
                strategy: format!("{:?}", result.strategy),
                inside_region: result.inside_region,
            })
            .collect();
        let drawn = results.iter().filter(|r| r.fits).count();
        let pushed_out = results
            .iter()
            .filter(|r| r.fits && r.strategy == PlacementStrategy::PushOut)
            .count();
        LabelDump {
            count: labels.len(),
            drawn,
            suppressed: results.len() - drawn,
            pushed_out,
            labels,
        }
    }

    pub fn to_json_string(&self) -> anyhow::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

pub fn write_label_dump(
    path: &Path,
    requests: &[LabelRequest],
    results: &[LabelResult],
) -> anyhow::Result<()> {
    let file = File::create(path)?;
    let writer = BufWriter::new(file);
    let dump = LabelDump::from_results(requests, results);
    serde_json::to_writer_pretty(writer, &dump)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StyleConfig;
    use crate::layout::{AxisAlignedBox, Region, layout_labels};
    use crate::text_metrics::HeuristicMetrics;

    #[test]
    fn dump_counts_drawn_and_suppressed() {
        let requests = vec![
            LabelRequest::new("Sales", Region::Box(AxisAlignedBox::new(0.0, 0.0, 200.0, 40.0))),
            LabelRequest::new("Sales", Region::Box(AxisAlignedBox::new(0.0, 0.0, 1.0, 40.0))),
        ];
        let results = layout_labels(&requests, &StyleConfig::default(), &HeuristicMetrics);
        let dump = LabelDump::from_results(&requests, &results);
        assert_eq!(dump.count, 2);
        assert_eq!(dump.drawn, 1);
        assert_eq!(dump.suppressed, 1);

        let json = dump.to_json_string().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["labels"][0]["lines"][0], "Sales");
        assert_eq!(value["labels"][1]["fits"], false);
        assert_eq!(value["labels"][0]["strategy"], "Preferred");
    }
}
