//! Renderer-procedural argument block.
//!
//! A renderer procedural receives its configuration as a flat argv-style
//! data string. [`ProcArgs`] parses it once at startup and is read-only
//! afterwards.

use std::fmt;

use crate::util::{Error, Result};

/// How the renderer draws each point.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum PointMode {
    #[default]
    Disk,
    Sphere,
    Quad,
}

impl PointMode {
    pub fn from_tag(tag: u32) -> Option<Self> {
        Some(match tag {
            0 => Self::Disk,
            1 => Self::Sphere,
            2 => Self::Quad,
            _ => return None,
        })
    }
}

impl fmt::Display for PointMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Disk => "disk",
            Self::Sphere => "sphere",
            Self::Quad => "quad",
        };
        f.write_str(name)
    }
}

/// Flat parameter set for the point-rendering procedural.
#[derive(Clone, Debug)]
pub struct ProcArgs {
    pub velocity_scale: f32,
    pub point_radius: f32,
    pub point_mode: PointMode,
    pub enable_velocity_motion_blur: bool,
    pub perform_emission: bool,
    pub filename: String,
    pub tile_index: usize,
    pub tile_depth: usize,
}

impl Default for ProcArgs {
    fn default() -> Self {
        Self {
            velocity_scale: 1.0,
            point_radius: 0.01,
            point_mode: PointMode::Disk,
            enable_velocity_motion_blur: false,
            perform_emission: false,
            filename: String::new(),
            tile_index: 0,
            tile_depth: 0,
        }
    }
}

impl ProcArgs {
    /// Parse an argv-style data string.
    pub fn parse(args: &[&str]) -> Result<Self> {
        let mut out = Self::default();
        let mut it = args.iter();
        while let Some(&arg) = it.next() {
            match arg {
                "--velocity-scale" => out.velocity_scale = next_value(&mut it, arg)?,
                "--point-radius" => out.point_radius = next_value(&mut it, arg)?,
                "--point-mode" => {
                    let tag: u32 = next_value(&mut it, arg)?;
                    out.point_mode = PointMode::from_tag(tag)
                        .ok_or_else(|| Error::other(format!("invalid point mode {tag}")))?;
                }
                "--velocity-blur" => out.enable_velocity_motion_blur = true,
                "--emit" => out.perform_emission = true,
                "--bif" => {
                    out.filename = it
                        .next()
                        .ok_or_else(|| Error::other("missing value for --bif"))?
                        .to_string();
                }
                "--tile-index" => out.tile_index = next_value(&mut it, arg)?,
                "--tile-depth" => out.tile_depth = next_value(&mut it, arg)?,
                other => return Err(Error::other(format!("unknown argument \"{other}\""))),
            }
        }
        Ok(out)
    }
}

fn next_value<T: std::str::FromStr>(
    it: &mut std::slice::Iter<'_, &str>,
    flag: &str,
) -> Result<T> {
    let value = it
        .next()
        .ok_or_else(|| Error::other(format!("missing value for {flag}")))?;
    value
        .parse()
        .map_err(|_| Error::other(format!("invalid value \"{value}\" for {flag}")))
}

impl fmt::Display for ProcArgs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "velocityScale            = {}", self.velocity_scale)?;
        writeln!(f, "pointRadius              = {}", self.point_radius)?;
        writeln!(f, "pointMode                = {}", self.point_mode)?;
        writeln!(f, "enableVelocityMotionBlur = {}", self.enable_velocity_motion_blur)?;
        writeln!(f, "performEmission          = {}", self.perform_emission)?;
        writeln!(f, "filename                 = {}", self.filename)?;
        writeln!(f, "tileIndex                = {}", self.tile_index)?;
        write!(f, "tileDepth                = {}", self.tile_depth)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let args = ProcArgs::parse(&[]).unwrap();
        assert_eq!(args.velocity_scale, 1.0);
        assert_eq!(args.point_radius, 0.01);
        assert_eq!(args.point_mode, PointMode::Disk);
        assert!(!args.enable_velocity_motion_blur);
    }

    #[test]
    fn test_full_parse() {
        let args = ProcArgs::parse(&[
            "--velocity-scale",
            "2.5",
            "--point-radius",
            "0.1",
            "--point-mode",
            "1",
            "--velocity-blur",
            "--bif",
            "sim.bif",
            "--tile-index",
            "4",
            "--tile-depth",
            "1",
            "--emit",
        ])
        .unwrap();
        assert_eq!(args.velocity_scale, 2.5);
        assert_eq!(args.point_mode, PointMode::Sphere);
        assert!(args.enable_velocity_motion_blur);
        assert!(args.perform_emission);
        assert_eq!(args.filename, "sim.bif");
        assert_eq!(args.tile_index, 4);
        assert_eq!(args.tile_depth, 1);
    }

    #[test]
    fn test_parse_errors() {
        assert!(ProcArgs::parse(&["--point-mode", "7"]).is_err());
        assert!(ProcArgs::parse(&["--velocity-scale"]).is_err());
        assert!(ProcArgs::parse(&["--frobnicate"]).is_err());
    }
}
