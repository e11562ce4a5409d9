use log::{debug, info, warn};
use pixelcraft_domain::{EffectParams, ImageKind, RenderedFrame, SourceImage, MAX_UPLOAD_BYTES};

use crate::{
    ApplicationError, Clock, CloseImageCommand, EffectParamsQuery, ExportArtifact,
    ExportImageCommand, FrameEncoder, FrameRenderer, ImageDecoder, LoadImageCommand, LoadedImage,
    RenderPreviewCommand, ResetEffectsCommand, SetEffectCommand,
};

/// One in-memory editing session: at most one decoded source image and the
/// current effect tuple. Discarded on close; nothing persists.
pub struct EditorService {
    decoder: Box<dyn ImageDecoder>,
    renderer: Box<dyn FrameRenderer>,
    encoder: Box<dyn FrameEncoder>,
    clock: Box<dyn Clock>,
    source: Option<SourceImage>,
    params: EffectParams,
}

impl EditorService {
    pub fn new(
        decoder: Box<dyn ImageDecoder>,
        renderer: Box<dyn FrameRenderer>,
        encoder: Box<dyn FrameEncoder>,
        clock: Box<dyn Clock>,
    ) -> Self {
        Self {
            decoder,
            renderer,
            encoder,
            clock,
            source: None,
            params: EffectParams::default(),
        }
    }

    /// Upload boundary: gate on declared MIME and byte size before touching
    /// the decoder. A rejected upload leaves no source behind.
    pub fn load_image(&mut self, command: LoadImageCommand) -> Result<LoadedImage, ApplicationError> {
        let kind = ImageKind::from_mime(&command.declared_mime);
        if !kind.is_supported() {
            return Err(ApplicationError::InvalidInput(format!(
                "unsupported file type: {}",
                command.declared_mime
            )));
        }
        if command.bytes.len() as u64 > MAX_UPLOAD_BYTES {
            return Err(ApplicationError::InvalidInput(format!(
                "file {} exceeds the {} MiB limit",
                command.file_name,
                MAX_UPLOAD_BYTES / (1024 * 1024)
            )));
        }

        let source = self.decoder.decode(&command.bytes)?;
        let loaded = LoadedImage {
            width: source.width(),
            height: source.height(),
            kind,
        };
        info!(
            "loaded {} ({}x{}, {:?})",
            command.file_name, loaded.width, loaded.height, kind
        );

        // a new upload starts a fresh session
        self.source = Some(source);
        self.params = EffectParams::default();
        Ok(loaded)
    }

    /// Rejected values leave the session untouched; the caller keeps showing
    /// the previous state.
    pub fn set_effect(&mut self, command: SetEffectCommand) -> Result<EffectParams, ApplicationError> {
        match self.params.with(command.param, command.value) {
            Ok(next) => {
                self.params = next;
                Ok(next)
            }
            Err(error) => {
                warn!("rejected {}={}: {error}", command.param.name(), command.value);
                Err(error.into())
            }
        }
    }

    pub fn reset_effects(&mut self, _command: ResetEffectsCommand) -> EffectParams {
        self.params = EffectParams::reset();
        self.params
    }

    pub fn effect_params(&self, _query: EffectParamsQuery) -> EffectParams {
        self.params
    }

    pub fn render_preview(
        &self,
        _command: RenderPreviewCommand,
    ) -> Result<RenderedFrame, ApplicationError> {
        let source = self.source.as_ref().ok_or(ApplicationError::NotReady)?;
        debug!(
            "rendering {}x{} with {:?}",
            source.width(),
            source.height(),
            self.params
        );
        self.renderer.render(source, &self.params)
    }

    /// Applies the identical chain as the preview at native resolution, so
    /// the encoded file matches the on-screen pixels.
    pub fn export_image(
        &self,
        _command: ExportImageCommand,
    ) -> Result<ExportArtifact, ApplicationError> {
        let source = self.source.as_ref().ok_or(ApplicationError::NotReady)?;
        let frame = self.renderer.render(source, &self.params)?;
        let bytes = self.encoder.encode(&frame)?;
        let file_name = format!("edited-image-{}.png", self.clock.now_timestamp_string());
        info!("exported {} ({} bytes)", file_name, bytes.len());
        Ok(ExportArtifact { file_name, bytes })
    }

    pub fn close_image(&mut self, _command: CloseImageCommand) {
        self.source = None;
        self.params = EffectParams::default();
    }

    pub fn has_source(&self) -> bool {
        self.source.is_some()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use pixelcraft_domain::{DomainError, EffectParam};

    use super::*;

    struct FakeDecoder {
        width: u32,
        height: u32,
    }

    impl ImageDecoder for FakeDecoder {
        fn decode(&self, _bytes: &[u8]) -> Result<SourceImage, ApplicationError> {
            let pixels = vec![127_u8; self.width as usize * self.height as usize * 4];
            SourceImage::from_rgba8(self.width, self.height, pixels).map_err(Into::into)
        }
    }

    #[derive(Default)]
    struct RecordingRenderer {
        rendered_with: Rc<RefCell<Vec<EffectParams>>>,
    }

    impl FrameRenderer for RecordingRenderer {
        fn render(
            &self,
            source: &SourceImage,
            effects: &EffectParams,
        ) -> Result<RenderedFrame, ApplicationError> {
            self.rendered_with.borrow_mut().push(*effects);
            Ok(RenderedFrame {
                width: source.width(),
                height: source.height(),
                pixels: source.pixels().to_vec(),
            })
        }
    }

    struct FakeEncoder;

    impl FrameEncoder for FakeEncoder {
        fn encode(&self, frame: &RenderedFrame) -> Result<Vec<u8>, ApplicationError> {
            Ok(frame.pixels.clone())
        }
    }

    struct FailingEncoder;

    impl FrameEncoder for FailingEncoder {
        fn encode(&self, _frame: &RenderedFrame) -> Result<Vec<u8>, ApplicationError> {
            Err(ApplicationError::Encode("surface gave no bytes".to_string()))
        }
    }

    struct FakeClock;

    impl Clock for FakeClock {
        fn now_timestamp_string(&self) -> String {
            "1700000000000".to_string()
        }
    }

    fn service_with_renderer(renderer: RecordingRenderer) -> EditorService {
        EditorService::new(
            Box::new(FakeDecoder {
                width: 8,
                height: 6,
            }),
            Box::new(renderer),
            Box::new(FakeEncoder),
            Box::new(FakeClock),
        )
    }

    fn jpeg_upload(bytes: Vec<u8>) -> LoadImageCommand {
        LoadImageCommand {
            file_name: "photo.jpg".to_string(),
            declared_mime: "image/jpeg".to_string(),
            bytes,
        }
    }

    #[test]
    fn load_render_export_workflow() {
        let renderer = RecordingRenderer::default();
        let calls = Rc::clone(&renderer.rendered_with);
        let mut service = service_with_renderer(renderer);

        let loaded = service.load_image(jpeg_upload(vec![0; 64])).expect("load");
        assert_eq!(loaded.width, 8);
        assert_eq!(loaded.kind, ImageKind::Jpeg);
        assert!(service.has_source());

        let frame = service.render_preview(RenderPreviewCommand).expect("render");
        assert_eq!((frame.width, frame.height), (8, 6));

        let artifact = service.export_image(ExportImageCommand).expect("export");
        assert_eq!(artifact.file_name, "edited-image-1700000000000.png");
        assert_eq!(artifact.bytes, frame.pixels);

        // preview and export both went through the same renderer with the
        // same params
        let calls = calls.borrow();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0], calls[1]);
    }

    #[test]
    fn render_before_load_is_not_ready() {
        let service = service_with_renderer(RecordingRenderer::default());
        assert!(matches!(
            service.render_preview(RenderPreviewCommand),
            Err(ApplicationError::NotReady)
        ));
        assert!(matches!(
            service.export_image(ExportImageCommand),
            Err(ApplicationError::NotReady)
        ));
    }

    #[test]
    fn load_rejects_unsupported_mime() {
        let mut service = service_with_renderer(RecordingRenderer::default());
        let result = service.load_image(LoadImageCommand {
            file_name: "report.pdf".to_string(),
            declared_mime: "application/pdf".to_string(),
            bytes: vec![0; 16],
        });
        assert!(matches!(result, Err(ApplicationError::InvalidInput(_))));
        assert!(!service.has_source());
    }

    #[test]
    fn load_rejects_oversized_upload() {
        let mut service = service_with_renderer(RecordingRenderer::default());
        let result = service.load_image(jpeg_upload(vec![0; 60 * 1024 * 1024]));
        assert!(matches!(result, Err(ApplicationError::InvalidInput(_))));
        assert!(!service.has_source());
    }

    #[test]
    fn rejected_set_keeps_previous_state() {
        let mut service = service_with_renderer(RecordingRenderer::default());
        service
            .set_effect(SetEffectCommand {
                param: EffectParam::Contrast,
                value: 130.0,
            })
            .expect("in range");

        let result = service.set_effect(SetEffectCommand {
            param: EffectParam::Contrast,
            value: 999.0,
        });
        assert!(matches!(
            result,
            Err(ApplicationError::Domain(DomainError::RangeRejected { .. }))
        ));
        assert_eq!(service.effect_params(EffectParamsQuery).contrast, 130.0);
    }

    #[test]
    fn reset_and_close_restore_identity() {
        let mut service = service_with_renderer(RecordingRenderer::default());
        service.load_image(jpeg_upload(vec![0; 16])).expect("load");
        service
            .set_effect(SetEffectCommand {
                param: EffectParam::Hue,
                value: 45.0,
            })
            .expect("in range");

        let after_reset = service.reset_effects(ResetEffectsCommand);
        assert!(after_reset.is_identity());

        service.close_image(CloseImageCommand);
        assert!(!service.has_source());
        assert!(service.effect_params(EffectParamsQuery).is_identity());
    }

    #[test]
    fn new_upload_resets_effects() {
        let mut service = service_with_renderer(RecordingRenderer::default());
        service.load_image(jpeg_upload(vec![0; 16])).expect("load");
        service
            .set_effect(SetEffectCommand {
                param: EffectParam::Sepia,
                value: 80.0,
            })
            .expect("in range");

        service.load_image(jpeg_upload(vec![0; 16])).expect("reload");
        assert!(service.effect_params(EffectParamsQuery).is_identity());
    }

    #[test]
    fn export_surfaces_encoder_failure() {
        let mut service = EditorService::new(
            Box::new(FakeDecoder {
                width: 2,
                height: 2,
            }),
            Box::new(RecordingRenderer::default()),
            Box::new(FailingEncoder),
            Box::new(FakeClock),
        );
        service.load_image(jpeg_upload(vec![0; 16])).expect("load");
        assert!(matches!(
            service.export_image(ExportImageCommand),
            Err(ApplicationError::Encode(_))
        ));
    }
}
