mod config;
mod logging;
mod ui;

use std::path::Path;
use std::process::ExitCode;

use config::AppConfig;
use pixelcraft_adapters::{
    present_effect_params, present_export, present_loaded, CpuCompositor, ImageCrateDecoder,
    PngFrameEncoder, SystemClock,
};
use pixelcraft_application::{
    EditorService, EffectParamsQuery, ExportImageCommand, LoadImageCommand, SetEffectCommand,
};
use pixelcraft_domain::{detect_image_kind, EffectParam, EffectParams};

fn main() -> ExitCode {
    logging::init_logging();
    let args: Vec<String> = std::env::args().collect();
    let config = AppConfig::default();

    let command = parse_command(&args);
    match run_command(command, &config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(CommandError::Usage(msg)) => {
            eprintln!("{msg}");
            print_usage();
            ExitCode::from(2)
        }
        Err(CommandError::Runtime(msg)) => {
            eprintln!("{msg}");
            ExitCode::from(1)
        }
    }
}

fn build_editor_service() -> EditorService {
    EditorService::new(
        Box::new(ImageCrateDecoder),
        Box::new(CpuCompositor),
        Box::new(PngFrameEncoder),
        Box::new(SystemClock),
    )
}

#[derive(Debug, Clone)]
enum Command {
    Ui {
        image: String,
    },
    Show {
        image: String,
    },
    Render {
        image: String,
        edits: Vec<(EffectParam, f32)>,
        preset: Option<String>,
        out: Option<String>,
    },
}

#[derive(Debug, Clone)]
enum CommandError {
    Usage(String),
    Runtime(String),
}

fn parse_command(args: &[String]) -> Result<Command, CommandError> {
    if args.len() <= 1 {
        return Err(CommandError::Usage("missing command".to_string()));
    }

    match args[1].as_str() {
        "ui" => {
            let image = args
                .get(2)
                .ok_or_else(|| CommandError::Usage("missing image path".to_string()))?;
            Ok(Command::Ui {
                image: image.clone(),
            })
        }
        "show" => {
            let image = args
                .get(2)
                .ok_or_else(|| CommandError::Usage("missing image path".to_string()))?;
            Ok(Command::Show {
                image: image.clone(),
            })
        }
        "render" => {
            let image = args
                .get(2)
                .ok_or_else(|| CommandError::Usage("missing image path".to_string()))?
                .clone();
            let mut edits = Vec::new();
            let mut preset = None;
            let mut out = None;
            let mut index = 3;
            while index < args.len() {
                match args[index].as_str() {
                    "--effects" => {
                        let path = args.get(index + 1).ok_or_else(|| {
                            CommandError::Usage("--effects needs a file path".to_string())
                        })?;
                        preset = Some(path.clone());
                        index += 2;
                    }
                    "--out" => {
                        let path = args.get(index + 1).ok_or_else(|| {
                            CommandError::Usage("--out needs a file path".to_string())
                        })?;
                        out = Some(path.clone());
                        index += 2;
                    }
                    pair => {
                        edits.push(parse_edit(pair)?);
                        index += 1;
                    }
                }
            }
            Ok(Command::Render {
                image,
                edits,
                preset,
                out,
            })
        }
        other => Err(CommandError::Usage(format!("unknown command: {other}"))),
    }
}

fn parse_edit(pair: &str) -> Result<(EffectParam, f32), CommandError> {
    let (name, raw_value) = pair
        .split_once('=')
        .ok_or_else(|| CommandError::Usage(format!("expected name=value, got: {pair}")))?;
    let param = EffectParam::from_name(name)
        .ok_or_else(|| CommandError::Usage(format!("unknown effect parameter: {name}")))?;
    let value = raw_value
        .parse::<f32>()
        .map_err(|_| CommandError::Usage(format!("invalid value for {name}: {raw_value}")))?;
    Ok((param, value))
}

fn run_command(
    command: Result<Command, CommandError>,
    config: &AppConfig,
) -> Result<(), CommandError> {
    match command? {
        Command::Ui { image } => {
            let mut service = build_editor_service();
            let loaded = load_from_path(&mut service, &image)?;
            println!("{}", present_loaded(&image, &loaded));
            ui::launch_window(&mut service, &image, config).map_err(CommandError::Runtime)
        }
        Command::Show { image } => {
            let mut service = build_editor_service();
            let loaded = load_from_path(&mut service, &image)?;
            println!("{}", present_loaded(&image, &loaded));
            println!(
                "{}",
                present_effect_params(&service.effect_params(EffectParamsQuery))
            );
            Ok(())
        }
        Command::Render {
            image,
            edits,
            preset,
            out,
        } => {
            let mut service = build_editor_service();
            load_from_path(&mut service, &image)?;

            if let Some(path) = preset {
                for (param, value) in read_preset(&path)? {
                    apply_edit(&mut service, param, value)?;
                }
            }
            for (param, value) in edits {
                apply_edit(&mut service, param, value)?;
            }

            let artifact = service
                .export_image(ExportImageCommand)
                .map_err(|error| CommandError::Runtime(format!("export failed: {error}")))?;
            let target = match out {
                Some(path) => path,
                None => {
                    std::fs::create_dir_all(&config.export_dir).map_err(|error| {
                        CommandError::Runtime(format!("cannot create export dir: {error}"))
                    })?;
                    format!("{}/{}", config.export_dir, artifact.file_name)
                }
            };
            std::fs::write(&target, &artifact.bytes)
                .map_err(|error| CommandError::Runtime(format!("cannot write {target}: {error}")))?;
            println!("{} -> {}", present_export(&artifact), target);
            Ok(())
        }
    }
}

fn load_from_path(
    service: &mut EditorService,
    path: &str,
) -> Result<pixelcraft_application::LoadedImage, CommandError> {
    let bytes = std::fs::read(path)
        .map_err(|error| CommandError::Runtime(format!("cannot read {path}: {error}")))?;
    let kind = detect_image_kind(Path::new(path));
    service
        .load_image(LoadImageCommand {
            file_name: path.to_string(),
            declared_mime: kind.mime().to_string(),
            bytes,
        })
        .map_err(|error| CommandError::Runtime(format!("load failed: {error}")))
}

fn apply_edit(
    service: &mut EditorService,
    param: EffectParam,
    value: f32,
) -> Result<(), CommandError> {
    service
        .set_effect(SetEffectCommand { param, value })
        .map_err(|error| CommandError::Runtime(format!("rejected edit: {error}")))?;
    Ok(())
}

fn read_preset(path: &str) -> Result<Vec<(EffectParam, f32)>, CommandError> {
    let text = std::fs::read_to_string(path)
        .map_err(|error| CommandError::Runtime(format!("cannot read {path}: {error}")))?;
    let params: EffectParams = serde_json::from_str(&text)
        .map_err(|error| CommandError::Runtime(format!("invalid preset {path}: {error}")))?;
    params
        .validate()
        .map_err(|error| CommandError::Runtime(format!("invalid preset {path}: {error}")))?;
    Ok(EffectParam::ALL
        .into_iter()
        .map(|param| (param, params.get(param)))
        .collect())
}

fn print_usage() {
    println!("usage:");
    println!("  pixelcraft ui <image>");
    println!("  pixelcraft show <image>");
    println!("  pixelcraft render <image> [name=value ...] [--effects <preset.json>] [--out <path>]");
    println!();
    println!("effect parameters: brightness contrast saturation hue blur opacity invert sepia");
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(parts: &[&str]) -> Vec<String> {
        std::iter::once("pixelcraft")
            .chain(parts.iter().copied())
            .map(String::from)
            .collect()
    }

    #[test]
    fn parse_render_with_edits_and_out() {
        let command = parse_command(&args(&[
            "render",
            "photo.png",
            "brightness=150",
            "blur=2.5",
            "--out",
            "result.png",
        ]))
        .expect("render should parse");
        match command {
            Command::Render {
                image, edits, out, ..
            } => {
                assert_eq!(image, "photo.png");
                assert_eq!(edits[0], (EffectParam::Brightness, 150.0));
                assert_eq!(edits[1], (EffectParam::Blur, 2.5));
                assert_eq!(out.as_deref(), Some("result.png"));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn parse_rejects_unknown_parameter() {
        let result = parse_command(&args(&["render", "photo.png", "gamma=1.5"]));
        assert!(matches!(result, Err(CommandError::Usage(_))));
    }

    #[test]
    fn parse_rejects_unknown_command() {
        let result = parse_command(&args(&["upload", "photo.png"]));
        assert!(matches!(result, Err(CommandError::Usage(_))));
    }

    #[test]
    fn render_command_writes_a_decodable_png() {
        use image::{ImageBuffer, Rgba};

        let dir = tempfile::tempdir().expect("tempdir");
        let input = dir.path().join("input.png");
        let output = dir.path().join("output.png");
        let fixture = ImageBuffer::from_pixel(6, 4, Rgba([200_u8, 100, 50, 255]));
        fixture.save(&input).expect("save fixture");

        let config = AppConfig::default();
        let command = parse_command(&args(&[
            "render",
            input.to_str().expect("utf8 path"),
            "invert=100",
            "--out",
            output.to_str().expect("utf8 path"),
        ]));
        run_command(command, &config).expect("render should succeed");

        let exported = image::open(&output).expect("open export").to_rgba8();
        assert_eq!((exported.width(), exported.height()), (6, 4));
        assert_eq!(exported.get_pixel(0, 0).0, [55, 155, 205, 255]);
    }

    #[test]
    fn preset_round_trips_through_json() {
        let dir = tempfile::tempdir().expect("tempdir");
        let preset_path = dir.path().join("preset.json");
        let params = EffectParams {
            sepia: 40.0,
            hue: 120.0,
            ..EffectParams::default()
        };
        std::fs::write(
            &preset_path,
            serde_json::to_string(&params).expect("serialize"),
        )
        .expect("write preset");

        let edits = read_preset(preset_path.to_str().expect("utf8 path")).expect("read preset");
        assert!(edits.contains(&(EffectParam::Sepia, 40.0)));
        assert!(edits.contains(&(EffectParam::Hue, 120.0)));
        assert!(edits.contains(&(EffectParam::Brightness, 100.0)));
    }

    #[test]
    fn out_of_range_preset_is_rejected() {
        let dir = tempfile::tempdir().expect("tempdir");
        let preset_path = dir.path().join("preset.json");
        std::fs::write(
            &preset_path,
            r#"{"brightness":500,"contrast":100,"saturation":100,"hue":0,"blur":0,"opacity":100,"invert":0,"sepia":0}"#,
        )
        .expect("write preset");

        let result = read_preset(preset_path.to_str().expect("utf8 path"));
        assert!(matches!(result, Err(CommandError::Runtime(_))));
    }
}
