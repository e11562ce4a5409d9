use pixelcraft_domain::EffectParam;

#[derive(Debug, Clone)]
pub struct LoadImageCommand {
    pub file_name: String,
    pub declared_mime: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone, Copy)]
pub struct SetEffectCommand {
    pub param: EffectParam,
    pub value: f32,
}

#[derive(Debug, Clone, Default)]
pub struct ResetEffectsCommand;

#[derive(Debug, Clone, Default)]
pub struct RenderPreviewCommand;

#[derive(Debug, Clone, Default)]
pub struct ExportImageCommand;

#[derive(Debug, Clone, Default)]
pub struct CloseImageCommand;

#[derive(Debug, Clone, Default)]
pub struct EffectParamsQuery;
