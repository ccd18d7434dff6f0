use crate::cli::{ExtractArgs, FormatArg, InfoArgs};
use crate::error::{CliError, Result};
use crystmap::core::io::traits::DensityMapFile;
use crystmap::core::io::{MapFormat, ccp4::Ccp4File, dsn6::Dsn6File};
use crystmap::core::models::map::{DensityMap, ExtractedBlock};
use nalgebra::Point3;
use serde::Serialize;
use std::fs;
use std::path::Path;
use tracing::{debug, info};

fn resolve_format(buf: &[u8], requested: Option<FormatArg>, path: &Path) -> Result<MapFormat> {
    match requested {
        Some(FormatArg::Ccp4) => Ok(MapFormat::Ccp4),
        Some(FormatArg::Dsn6) => Ok(MapFormat::Dsn6),
        None => MapFormat::sniff(buf).ok_or_else(|| CliError::UnknownFormat {
            path: path.to_path_buf(),
        }),
    }
}

fn load(path: &Path, requested: Option<FormatArg>) -> Result<(DensityMap, MapFormat)> {
    let buf = fs::read(path)?;
    let format = resolve_format(&buf, requested, path)?;
    debug!("decoding {} as {:?} ({} bytes)", path.display(), format, buf.len());
    let map = format.decode(&buf).map_err(|source| CliError::Decode {
        path: path.to_path_buf(),
        source,
    })?;
    Ok((map, format))
}

pub fn info(args: InfoArgs) -> Result<()> {
    let buf = fs::read(&args.path)?;
    let format = resolve_format(&buf, args.format, &args.path)?;
    info!("inspecting {} as {:?}", args.path.display(), format);

    let wrap = |source| CliError::Decode {
        path: args.path.clone(),
        source,
    };
    println!("file:    {}", args.path.display());
    println!("format:  {:?}", format);
    let map = match format {
        MapFormat::Ccp4 => {
            let (map, meta) = Ccp4File::decode(&buf).map_err(wrap)?;
            println!("mode:    {}", meta.mode);
            println!("sg:      {}", meta.space_group);
            println!("min/max: {} / {}", meta.min, meta.max);
            println!("nsymbt:  {}", meta.nsymbt);
            map
        }
        MapFormat::Dsn6 => {
            let (map, meta) = Dsn6File::decode(&buf).map_err(wrap)?;
            println!("origin:  {:?}", meta.origin);
            println!("swapped: {}", meta.byte_swapped);
            println!("scale:   prod={} plus={}", meta.prod, meta.plus);
            map
        }
    };

    let [a, b, c, alpha, beta, gamma] = map.unit_cell().parameters();
    println!("cell:    {a} {b} {c}  {alpha} {beta} {gamma}");
    println!("box:     {:?} of {:?}", map.grid().n_real(), map.grid().n_grid());
    println!("mean:    {}", map.mean());
    println!("rms:     {}", map.rms());
    Ok(())
}

#[derive(Debug, Serialize)]
struct BlockReport {
    format: String,
    mean: f64,
    rms: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    sigma: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    abs_level: Option<f64>,
    #[serde(flatten)]
    block: ExtractedBlock,
}

pub fn extract(args: ExtractArgs) -> Result<()> {
    let (map, format) = load(&args.path, args.format)?;

    let center = match args.center.as_deref() {
        Some([x, y, z]) => Some(Point3::new(*x, *y, *z)),
        Some(other) => {
            return Err(CliError::Argument(format!(
                "--center takes exactly three coordinates, got {}",
                other.len()
            )));
        }
        None => None,
    };
    let radius = args.radius.unwrap_or(0.0);

    let block = map.extract_block(radius, center)?;
    info!(
        "extracted {:?} block ({} samples)",
        block.size,
        block.values.len()
    );

    let report = BlockReport {
        format: format!("{format:?}"),
        mean: map.mean(),
        rms: map.rms(),
        sigma: args.sigma,
        abs_level: args.sigma.map(|s| map.abs_level(s)),
        block,
    };
    match args.output {
        Some(path) => {
            let file = fs::File::create(&path)?;
            serde_json::to_writer_pretty(file, &report).map_err(anyhow::Error::from)?;
            info!("wrote {}", path.display());
        }
        None => {
            serde_json::to_writer_pretty(std::io::stdout().lock(), &report)
                .map_err(anyhow::Error::from)?;
            println!();
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tiny_ccp4() -> Vec<u8> {
        let mut buf = vec![0u8; 1024];
        let put_i32 = |buf: &mut [u8], word: usize, v: i32| {
            buf[4 * word..4 * word + 4].copy_from_slice(&v.to_le_bytes());
        };
        let put_f32 = |buf: &mut [u8], word: usize, v: f32| {
            buf[4 * word..4 * word + 4].copy_from_slice(&v.to_le_bytes());
        };
        for a in 0..3 {
            put_i32(&mut buf, a, 2);
            put_i32(&mut buf, 7 + a, 2);
            put_i32(&mut buf, 16 + a, 1 + a as i32);
        }
        put_i32(&mut buf, 3, 2);
        for (a, v) in [10.0f32, 10.0, 10.0, 90.0, 90.0, 90.0].iter().enumerate() {
            put_f32(&mut buf, 10 + a, *v);
        }
        buf[208..212].copy_from_slice(b"MAP ");
        for v in 0..8 {
            buf.extend_from_slice(&(v as f32).to_le_bytes());
        }
        buf
    }

    #[test]
    fn explicit_format_overrides_sniffing() {
        let buf = tiny_ccp4();
        let format = resolve_format(&buf, Some(FormatArg::Dsn6), Path::new("x")).unwrap();
        assert_eq!(format, MapFormat::Dsn6);
    }

    #[test]
    fn sniffing_recognizes_the_ccp4_stamp() {
        let buf = tiny_ccp4();
        let format = resolve_format(&buf, None, Path::new("x")).unwrap();
        assert_eq!(format, MapFormat::Ccp4);
    }

    #[test]
    fn unrecognizable_buffer_asks_for_an_explicit_format() {
        let result = resolve_format(&[0u8; 64], None, Path::new("x"));
        assert!(matches!(result, Err(CliError::UnknownFormat { .. })));
    }

    #[test]
    fn load_decodes_a_map_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tiny.ccp4");
        fs::write(&path, tiny_ccp4()).unwrap();

        let (map, format) = load(&path, None).unwrap();
        assert_eq!(format, MapFormat::Ccp4);
        assert_eq!(map.grid().n_real(), [2, 2, 2]);
        assert_eq!(map.grid().get(1, 1, 1).unwrap(), 7.0);
    }
}
