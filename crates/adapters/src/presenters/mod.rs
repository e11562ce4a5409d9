use pixelcraft_application::{ExportArtifact, LoadedImage};
use pixelcraft_domain::{EffectParam, EffectParams};

pub fn present_loaded(file_name: &str, loaded: &LoadedImage) -> String {
    format!(
        "loaded {} (kind={:?}, {}x{})",
        file_name, loaded.kind, loaded.width, loaded.height
    )
}

pub fn present_effect_params(params: &EffectParams) -> String {
    if params.is_identity() {
        return "effects: identity (no adjustments)".to_string();
    }
    let fields = EffectParam::ALL
        .iter()
        .map(|param| format!("{}={}", param.name(), params.get(*param)))
        .collect::<Vec<_>>()
        .join(" ");
    format!("effects: {fields}")
}

pub fn present_export(artifact: &ExportArtifact) -> String {
    format!("exported {} ({} bytes)", artifact.file_name, artifact.bytes.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_params_present_as_identity() {
        assert_eq!(
            present_effect_params(&EffectParams::default()),
            "effects: identity (no adjustments)"
        );
    }

    #[test]
    fn edited_params_list_every_field() {
        let params = EffectParams::default()
            .with(EffectParam::Blur, 2.5)
            .expect("in range");
        let text = present_effect_params(&params);
        assert!(text.contains("blur=2.5"));
        assert!(text.contains("brightness=100"));
    }
}
