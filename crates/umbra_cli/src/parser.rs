//! Scene file parser.
//!
//! Scene files are plain text with one command per line. Arguments are
//! whitespace separated. Blank lines and lines starting with `#` are
//! ignored, and unknown commands are skipped with a warning.
//!
//! # Supported Commands
//!
//! - `png width height file` - image size and output file
//! - `color r g b` - current color for surfaces and lights
//! - `sphere x y z r`, `plane a b c d` - primitives with the current material
//! - `xyz x y z` - append a vertex carrying the current `normal` and `texcoord`
//! - `normal x y z`, `texcoord s t` - attributes for following vertices
//! - `tri i j k` - flat, untextured triangle (1-based indices, negative
//!   indices count back from the newest vertex)
//! - `trit i j k` - triangle with vertex normals, texture coordinates and the
//!   current texture
//! - `texture file` / `texture none` - current texture
//! - `sun x y z`, `bulb x y z` - directional and point lights
//! - `shininess s` / `shininess r g b`, `transparency t` / `transparency r g b`
//! - `ior n`, `roughness s`
//! - `eye`, `forward`, `up`, `right` with `x y z` - camera placement
//! - `fisheye`, `dof focus lens`, `expose v`
//! - `aa n`, `gi d`, `bounces d`

use std::path::{Path, PathBuf};
use std::sync::Arc;

use thiserror::Error;
use umbra_core::{
    Color, DepthOfField, Material, RenderSettings, Texture, TextureCache, TextureError,
};
use umbra_renderer::{Camera, Light, Plane, Scene, Sphere, Surface, Triangle, Vec2, Vec3, Vertex};

/// Errors that can occur while reading a scene file.
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("line {line}: invalid number '{token}'")]
    InvalidNumber { line: usize, token: String },

    #[error("line {line}: '{command}' expects {expected} arguments, got {found}")]
    ArgumentCount {
        line: usize,
        command: String,
        expected: &'static str,
        found: usize,
    },

    #[error("line {line}: vertex index {index} out of range ({count} vertices defined)")]
    VertexIndex { line: usize, index: i64, count: usize },

    #[error("line {line}: failed to load texture")]
    Texture {
        line: usize,
        #[source]
        source: TextureError,
    },

    #[error("scene has no 'png' command, image size is unknown")]
    MissingImage,
}

/// Result type for parsing operations.
pub type ParseResult<T> = Result<T, ParseError>;

/// A parsed scene plus the output file it asked for.
#[derive(Debug)]
pub struct SceneFile {
    pub scene: Scene,
    pub output: PathBuf,
}

/// Read and parse a scene file. Texture paths resolve against its directory.
pub fn parse_scene_file(path: &Path) -> ParseResult<SceneFile> {
    let source = std::fs::read_to_string(path)?;
    let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
    parse_scene(&source, TextureCache::with_base_dir(base_dir))
}

/// Parse scene text, loading textures through `textures`.
pub fn parse_scene(source: &str, textures: TextureCache) -> ParseResult<SceneFile> {
    let mut parser = SceneParser::new(textures);
    for (index, line) in source.lines().enumerate() {
        parser.line = index + 1;
        let mut tokens = line.split_whitespace();
        let Some(command) = tokens.next() else {
            continue;
        };
        if command.starts_with('#') {
            continue;
        }
        let args: Vec<&str> = tokens.collect();
        parser.command(command, &args)?;
    }
    parser.finish()
}

/// Mutable state accumulated while walking the file.
struct SceneParser {
    line: usize,
    settings: RenderSettings,
    camera: Camera,
    output: Option<PathBuf>,
    material: Material,
    normal: Vec3,
    texcoord: Vec2,
    vertices: Vec<Vertex>,
    surfaces: Vec<Surface>,
    lights: Vec<Light>,
    textures: TextureCache,
}

impl SceneParser {
    fn new(textures: TextureCache) -> Self {
        Self {
            line: 0,
            settings: RenderSettings::default(),
            camera: Camera::new(),
            output: None,
            material: Material::default(),
            normal: Vec3::ZERO,
            texcoord: Vec2::ZERO,
            vertices: Vec::new(),
            surfaces: Vec::new(),
            lights: Vec::new(),
            textures,
        }
    }

    fn command(&mut self, command: &str, args: &[&str]) -> ParseResult<()> {
        match command {
            "png" => {
                self.expect_args(command, args, &[3])?;
                self.settings.width = self.uint(args[0])?;
                self.settings.height = self.uint(args[1])?;
                self.output = Some(PathBuf::from(args[2]));
            }
            "color" => self.material.color = self.vec3(command, args)?,
            "sphere" => {
                self.expect_args(command, args, &[4])?;
                let center = self.vec3(command, &args[..3])?;
                let radius = self.float(args[3])?;
                self.surfaces
                    .push(Surface::new(Sphere::new(center, radius), self.material.clone()));
            }
            "plane" => {
                let [a, b, c, d] = self.floats::<4>(command, args)?;
                self.surfaces
                    .push(Surface::new(Plane::new(a, b, c, d), self.untextured()));
            }
            "xyz" => {
                let position = self.vec3(command, args)?;
                self.vertices.push(
                    Vertex::new(position)
                        .with_normal(self.normal)
                        .with_texcoord(self.texcoord),
                );
            }
            "normal" => self.normal = self.vec3(command, args)?,
            "texcoord" => {
                let [s, t] = self.floats::<2>(command, args)?;
                self.texcoord = Vec2::new(s, t);
            }
            "tri" => {
                let [a, b, c] = self.triangle_vertices(command, args)?;
                let triangle = Triangle::from_points(a.position, b.position, c.position);
                self.surfaces.push(Surface::new(triangle, self.untextured()));
            }
            "trit" => {
                let [a, b, c] = self.triangle_vertices(command, args)?;
                self.surfaces
                    .push(Surface::new(Triangle::new(a, b, c), self.material.clone()));
            }
            "texture" => {
                self.expect_args(command, args, &[1])?;
                self.material.texture = self.texture(args[0])?;
            }
            "sun" => {
                let direction = self.vec3(command, args)?;
                self.lights
                    .push(Light::directional(direction, self.material.color));
            }
            "bulb" => {
                let position = self.vec3(command, args)?;
                self.lights.push(Light::point(position, self.material.color));
            }
            "shininess" => self.material.shininess = self.weight(command, args)?,
            "transparency" => self.material.transparency = self.weight(command, args)?,
            "ior" => self.material.ior = self.single_float(command, args)?,
            "roughness" => self.material.roughness = self.single_float(command, args)?,
            "eye" => {
                let eye = self.vec3(command, args)?;
                self.camera.set_eye(eye);
            }
            "forward" => {
                let forward = self.vec3(command, args)?;
                self.camera.set_forward(forward);
            }
            "up" => {
                let up = self.vec3(command, args)?;
                self.camera.set_up(up);
            }
            "right" => {
                let right = self.vec3(command, args)?;
                self.camera.set_right(right);
            }
            "fisheye" => {
                self.expect_args(command, args, &[0])?;
                self.settings.fisheye = true;
            }
            "dof" => {
                let [focus, lens] = self.floats::<2>(command, args)?;
                self.settings.dof = Some(DepthOfField { focus, lens });
            }
            "expose" => self.settings.exposure = Some(self.single_float(command, args)?),
            "aa" => self.settings.aa = self.single_uint(command, args)?.max(1),
            "gi" => self.settings.gi_depth = self.single_uint(command, args)?,
            "bounces" => self.settings.bounces = self.single_uint(command, args)?,
            _ => log::warn!("line {}: unknown command '{}', skipping", self.line, command),
        }
        Ok(())
    }

    fn finish(self) -> ParseResult<SceneFile> {
        let output = self.output.ok_or(ParseError::MissingImage)?;

        let mut scene = Scene::new(self.settings).with_camera(self.camera);
        for surface in self.surfaces {
            scene.add_surface(surface);
        }
        for light in self.lights {
            scene.add_light(light);
        }

        log::info!(
            "Parsed scene: {}x{}, {} surfaces, {} lights, {} textures",
            scene.settings.width,
            scene.settings.height,
            scene.surfaces().len(),
            scene.lights().len(),
            self.textures.len()
        );
        log::debug!("BVH: {:?}", scene.bvh_stats());

        Ok(SceneFile { scene, output })
    }

    /// The current material without its texture.
    fn untextured(&self) -> Material {
        Material {
            texture: None,
            ..self.material.clone()
        }
    }

    fn texture(&mut self, name: &str) -> ParseResult<Option<Arc<Texture>>> {
        if name == "none" {
            return Ok(None);
        }
        let line = self.line;
        self.textures
            .load(name)
            .map(Some)
            .map_err(|source| ParseError::Texture { line, source })
    }

    fn triangle_vertices(&self, command: &str, args: &[&str]) -> ParseResult<[Vertex; 3]> {
        self.expect_args(command, args, &[3])?;
        Ok([
            self.vertex(args[0])?,
            self.vertex(args[1])?,
            self.vertex(args[2])?,
        ])
    }

    /// Look up a vertex by 1-based index, or by negative offset from the end.
    fn vertex(&self, token: &str) -> ParseResult<Vertex> {
        let index: i64 = token.parse().map_err(|_| self.invalid_number(token))?;
        let count = self.vertices.len();
        let resolved = match index {
            i if i > 0 => usize::try_from(i - 1).ok(),
            i if i < 0 => usize::try_from(i.unsigned_abs())
                .ok()
                .and_then(|back| count.checked_sub(back)),
            _ => None,
        };

        resolved
            .and_then(|i| self.vertices.get(i).copied())
            .ok_or(ParseError::VertexIndex {
                line: self.line,
                index,
                count,
            })
    }

    /// One value for all channels, or one per channel.
    fn weight(&self, command: &str, args: &[&str]) -> ParseResult<Color> {
        self.expect_args(command, args, &[1, 3])?;
        if args.len() == 1 {
            Ok(Color::splat(self.float(args[0])?))
        } else {
            self.vec3(command, args)
        }
    }

    fn vec3(&self, command: &str, args: &[&str]) -> ParseResult<Vec3> {
        Ok(Vec3::from_array(self.floats::<3>(command, args)?))
    }

    fn single_float(&self, command: &str, args: &[&str]) -> ParseResult<f32> {
        let [value] = self.floats::<1>(command, args)?;
        Ok(value)
    }

    fn single_uint(&self, command: &str, args: &[&str]) -> ParseResult<u32> {
        self.expect_args(command, args, &[1])?;
        self.uint(args[0])
    }

    fn floats<const N: usize>(&self, command: &str, args: &[&str]) -> ParseResult<[f32; N]> {
        self.expect_args(command, args, &[N])?;
        let mut values = [0.0; N];
        for (value, token) in values.iter_mut().zip(args) {
            *value = self.float(token)?;
        }
        Ok(values)
    }

    fn float(&self, token: &str) -> ParseResult<f32> {
        token.parse().map_err(|_| self.invalid_number(token))
    }

    fn uint(&self, token: &str) -> ParseResult<u32> {
        token.parse().map_err(|_| self.invalid_number(token))
    }

    fn invalid_number(&self, token: &str) -> ParseError {
        ParseError::InvalidNumber {
            line: self.line,
            token: token.to_string(),
        }
    }

    fn expect_args(&self, command: &str, args: &[&str], allowed: &[usize]) -> ParseResult<()> {
        if allowed.contains(&args.len()) {
            return Ok(());
        }
        let expected = match allowed {
            [0] => "no",
            [1] => "1",
            [2] => "2",
            [3] => "3",
            [4] => "4",
            [1, 3] => "1 or 3",
            _ => "a different number of",
        };
        Err(ParseError::ArgumentCount {
            line: self.line,
            command: command.to_string(),
            expected,
            found: args.len(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use umbra_renderer::Shape;

    fn parse(source: &str) -> ParseResult<SceneFile> {
        parse_scene(source, TextureCache::new())
    }

    #[test]
    fn test_parse_basic_scene() {
        let source = "\
png 320 240 out.png
# a comment

color 1 0.5 0.25
sphere 0 0 -1 0.5
plane 0 1 0 1
sun 0 1 1
bulb 1 2 3
";
        let file = parse(source).unwrap();
        let scene = &file.scene;

        assert_eq!(file.output, PathBuf::from("out.png"));
        assert_eq!(scene.settings.width, 320);
        assert_eq!(scene.settings.height, 240);
        assert_eq!(scene.surfaces().len(), 2);
        assert_eq!(scene.lights().len(), 2);

        let sphere = &scene.surfaces()[0];
        assert!(matches!(sphere.shape, Shape::Sphere(_)));
        assert_eq!(sphere.material.color, Color::new(1.0, 0.5, 0.25));
        assert_eq!(
            scene.lights()[1],
            Light::point(Vec3::new(1.0, 2.0, 3.0), Color::new(1.0, 0.5, 0.25))
        );
    }

    #[test]
    fn test_settings_commands() {
        let source = "\
png 8 8 x.png
aa 0
gi 2
bounces 6
fisheye
dof 5 0.1
expose 1.5
";
        let settings = parse(source).unwrap().scene.settings;
        assert_eq!(settings.aa, 1);
        assert_eq!(settings.gi_depth, 2);
        assert_eq!(settings.bounces, 6);
        assert!(settings.fisheye);
        assert_eq!(settings.dof, Some(DepthOfField { focus: 5.0, lens: 0.1 }));
        assert_eq!(settings.exposure, Some(1.5));
    }

    #[test]
    fn test_camera_commands() {
        let source = "\
png 8 8 x.png
eye 1 2 3
forward 0 0 -2
up 0 1 0
";
        let camera = parse(source).unwrap().scene.camera;
        assert_eq!(camera.eye(), Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(camera.forward(), Vec3::new(0.0, 0.0, -2.0));
        assert!((camera.right() - Vec3::X).length() < 1e-6);
        assert!((camera.up() - Vec3::Y).length() < 1e-6);
    }

    #[test]
    fn test_material_state_applies_to_following_surfaces() {
        let source = "\
png 8 8 x.png
sphere 0 0 -5 1
shininess 0.5
transparency 0.1 0.2 0.3
ior 1.33
roughness 0.05
sphere 0 0 -8 1
";
        let file = parse(source).unwrap();
        let [first, second] = file.scene.surfaces() else {
            panic!("expected two surfaces");
        };
        assert_eq!(first.material.shininess, Color::ZERO);
        assert_eq!(second.material.shininess, Color::splat(0.5));
        assert_eq!(second.material.transparency, Color::new(0.1, 0.2, 0.3));
        assert_eq!(second.material.ior, 1.33);
        assert_eq!(second.material.roughness, 0.05);
    }

    #[test]
    fn test_triangles_and_vertex_indices() {
        let source = "\
png 8 8 x.png
xyz 0 0 -1
xyz 1 0 -1
normal 0 1 0
texcoord 0.5 1
xyz 0 1 -1
tri 1 2 3
trit -3 -2 -1
";
        let file = parse(source).unwrap();
        assert_eq!(file.scene.surfaces().len(), 2);

        let Shape::Triangle(flat) = &file.scene.surfaces()[0].shape else {
            panic!("expected a triangle");
        };
        assert!((flat.face_normal() - Vec3::Z).length() < 1e-6);
    }

    #[test]
    fn test_vertex_index_errors() {
        for bad in ["tri 1 2 4", "tri 0 1 2", "tri -4 1 2"] {
            let source = format!("png 8 8 x.png\nxyz 0 0 0\nxyz 1 0 0\nxyz 0 1 0\n{bad}\n");
            match parse(&source) {
                Err(ParseError::VertexIndex { line, count, .. }) => {
                    assert_eq!(line, 5);
                    assert_eq!(count, 3);
                }
                other => panic!("expected vertex index error, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_invalid_number_reports_line() {
        match parse("png 8 8 x.png\n\nsphere 0 zero 0 1\n") {
            Err(ParseError::InvalidNumber { line, token }) => {
                assert_eq!(line, 3);
                assert_eq!(token, "zero");
            }
            other => panic!("expected invalid number, got {other:?}"),
        }
    }

    #[test]
    fn test_argument_count_errors() {
        assert!(matches!(
            parse("png 8 8 x.png\nsphere 0 0 1\n"),
            Err(ParseError::ArgumentCount { line: 2, found: 3, .. })
        ));
        assert!(matches!(
            parse("png 8 8 x.png\nshininess 0.1 0.2\n"),
            Err(ParseError::ArgumentCount { expected: "1 or 3", .. })
        ));
    }

    #[test]
    fn test_unknown_commands_are_skipped() {
        let file = parse("png 8 8 x.png\nteapot 1 2 3\nsphere 0 0 -1 1\n").unwrap();
        assert_eq!(file.scene.surfaces().len(), 1);
    }

    #[test]
    fn test_missing_png_is_an_error() {
        assert!(matches!(
            parse("sphere 0 0 -1 1\n"),
            Err(ParseError::MissingImage)
        ));
    }

    #[test]
    fn test_textures_come_from_cache() {
        let mut textures = TextureCache::new();
        textures.insert("red.png", Texture::solid_color(Color::new(1.0, 0.0, 0.0)));

        let source = "\
png 8 8 x.png
texture red.png
sphere 0 0 -3 1
plane 0 1 0 1
texture none
sphere 0 0 -6 1
";
        let file = parse_scene(source, textures).unwrap();
        let surfaces = file.scene.surfaces();
        assert!(surfaces[0].material.texture.is_some());
        assert!(surfaces[1].material.texture.is_none());
        assert!(surfaces[2].material.texture.is_none());
        assert_eq!(surfaces[0].color_at(Vec3::new(0.0, 0.0, -2.0)), Color::new(1.0, 0.0, 0.0));
    }

    #[test]
    fn test_missing_texture_file_is_an_error() {
        let source = "png 8 8 x.png\ntexture does-not-exist.png\n";
        assert!(matches!(
            parse(source),
            Err(ParseError::Texture { line: 2, .. })
        ));
    }
}
