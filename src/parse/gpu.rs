use roxmltree::{Document, Node};

use super::value;
use crate::error::ParseError;

/// Current temperature reading of the first GPU in the status report.
#[derive(Debug, Clone, PartialEq)]
pub struct GpuSample {
    pub temperature_c: f64,
}

/// Extracts the GPU temperature from an `nvidia-smi -x -q` XML report.
///
/// The report is rooted at `<nvidia_smi_log>` with the reading at
/// `gpu/temperature/gpu_temp`, formatted as `"<float> C"`.
pub fn parse_status(xml: &str) -> Result<GpuSample, ParseError> {
    let doc = Document::parse(xml)?;

    let root = doc.root_element();
    if !root.has_tag_name("nvidia_smi_log") {
        return Err(ParseError::MissingElement("nvidia_smi_log"));
    }

    let gpu = child(root, "gpu")?;
    let temperature = child(gpu, "temperature")?;
    let gpu_temp = child(temperature, "gpu_temp")?;

    let raw = gpu_temp.text().unwrap_or("");
    Ok(GpuSample {
        temperature_c: value::leading_number(raw)?,
    })
}

fn child<'a, 'i>(node: Node<'a, 'i>, name: &'static str) -> Result<Node<'a, 'i>, ParseError> {
    node.children()
        .find(|n| n.is_element() && n.has_tag_name(name))
        .ok_or(ParseError::MissingElement(name))
}
