use std::error::Error;
use std::fmt;
use std::sync::Arc;

use log::debug;

use super::camera::CameraConfig;
use super::material::{Material, MaterialParams, StandardMaterial};
use super::math::Vec3;
use super::primitive::{Primitive, Shape};
use super::scene::{Light, Scene};
use super::texture::{Checkerboard, Marble, Noise, SurfaceNormal, WoodGrain};

pub struct SceneParser {
    content: Vec<char>,
    buffer: String,
    position: FilePosition,
    // where the token in `buffer` starts, errors point there
    token_start: FilePosition,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct FilePosition {
    line: u32,
    column: u32,
    index: usize,
}

impl FilePosition {
    fn new() -> Self {
        FilePosition {
            line: 0,
            column: 0,
            index: 0,
        }
    }

    fn on_new_line(&mut self) {
        self.line += 1;
        self.column = 0;
        self.index += 1;
    }

    fn advance(&mut self) {
        self.column += 1;
        self.index += 1;
    }
}

#[derive(Debug)]
pub struct ParserError {
    position: FilePosition,
    pub message: String,
}

impl ParserError {
    fn new(message: &str, position: FilePosition) -> ParserError {
        ParserError {
            position,
            message: message.to_string(),
        }
    }

    /// 1-based line and column of the offending token.
    pub fn location(&self) -> (u32, u32) {
        (self.position.line + 1, self.position.column + 1)
    }

    /// The offending line with a caret under the token.
    pub fn error_location(&self, content: &str) -> Option<String> {
        content
            .lines()
            .nth(self.position.line as usize)
            .map(|line| format!("{}\n{}^", line, " ".repeat(self.position.column as usize)))
    }
}

impl fmt::Display for ParserError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let (line, column) = self.location();
        write!(f, "{} at {}:{}", self.message, line, column)
    }
}

impl Error for ParserError {}

type ParserResult<T> = Result<T, ParserError>;

/// Everything a scene file describes: how to look at the scene and what is in it.
#[derive(Debug)]
pub struct ImageData {
    pub camera: CameraConfig,
    pub scene: Scene,
}

impl SceneParser {
    pub fn new(content: &str) -> SceneParser {
        SceneParser {
            content: content.chars().collect(),
            buffer: String::new(),
            position: FilePosition::new(),
            token_start: FilePosition::new(),
        }
    }

    fn current_char(&self) -> Option<char> {
        self.content.get(self.position.index).copied()
    }

    fn is_empty(&mut self) -> bool {
        self.peek().is_empty()
    }

    fn advance(&mut self) {
        match self.current_char() {
            Some('\n') => self.position.on_new_line(),
            Some(_) => self.position.advance(),
            None => {}
        }
    }

    fn advance_until(&mut self, f: impl Fn(char) -> bool) {
        while let Some(current_char) = self.current_char() {
            if f(current_char) {
                break;
            }
            self.advance();
        }
    }

    fn eat_spaces(&mut self) {
        // empty lines, spaces and comments before the next token
        while let Some(current_char) = self.current_char() {
            if current_char == '#' {
                // the end of line is consumed below
                self.advance_until(|c| c == '\n');
            } else if !current_char.is_whitespace() {
                break;
            }
            self.advance();
        }
    }

    // appends the current char to `result` and returns the next one
    fn enqueue(&mut self, result: &mut String) -> Option<char> {
        if let Some(current_char) = self.current_char() {
            result.push(current_char);
            self.advance();
        }
        self.current_char()
    }

    fn pop(&mut self) -> String {
        // a peeked token is consumed first
        if !self.buffer.is_empty() {
            return std::mem::take(&mut self.buffer);
        }

        self.eat_spaces();
        self.token_start = self.position;
        let mut result = String::new();
        let Some(first) = self.current_char() else {
            return result;
        };

        match first {
            ',' | '(' | ')' | '>' => {
                self.enqueue(&mut result);
            }
            '.' | '+' | '-' | '0'..='9' => {
                let mut current_char = Some(first);
                if first == '+' || first == '-' {
                    current_char = self.enqueue(&mut result);
                }
                while current_char.map_or(false, |c| c.is_ascii_digit()) {
                    current_char = self.enqueue(&mut result);
                }
                if current_char == Some('.') {
                    current_char = self.enqueue(&mut result);
                    while current_char.map_or(false, |c| c.is_ascii_digit()) {
                        current_char = self.enqueue(&mut result);
                    }
                }
            }
            c if c.is_alphabetic() => {
                let mut current_char = Some(c);
                while current_char.map_or(false, |c| c.is_alphanumeric() || c == '_') {
                    current_char = self.enqueue(&mut result);
                }
            }
            _ => {
                // a lone unknown symbol becomes its own token so it can be reported
                self.enqueue(&mut result);
            }
        }
        result
    }

    fn peek(&mut self) -> &str {
        if self.buffer.is_empty() {
            self.buffer = self.pop();
        }
        &self.buffer
    }

    fn error<T>(&self, message: &str) -> ParserResult<T> {
        Err(ParserError::new(message, self.token_start))
    }

    fn parse_float(&mut self) -> ParserResult<f64> {
        let next_token = self.pop();
        match next_token.parse::<f64>() {
            Ok(num) if num.is_finite() => Ok(num),
            _ => self.error(&format!("cannot interpret '{}' as a number", next_token)),
        }
    }

    fn parse_dimension(&mut self, name: &str) -> ParserResult<u32> {
        let value = self.parse_float()?;
        if value < 1.0 || value.fract() != 0.0 || value > u32::MAX as f64 {
            return self.error(&format!("{} must be a positive integer, got {}", name, value));
        }
        Ok(value as u32)
    }

    fn match_token(&mut self, expected_lexem: &str) -> ParserResult<()> {
        let next_lexem = self.pop();
        if next_lexem != expected_lexem {
            self.error(&format!(
                "expected '{}', getting '{}' instead",
                expected_lexem, next_lexem
            ))
        } else {
            Ok(())
        }
    }

    fn maybe_match(&mut self, expected_lexem: &str) -> bool {
        if self.peek() == expected_lexem {
            self.pop();
            return true;
        }
        false
    }

    fn next_is_number(&mut self) -> bool {
        self.peek().parse::<f64>().is_ok()
    }

    fn parse_header(&mut self, camera: &mut CameraConfig) -> ParserResult<()> {
        self.match_token("size")?;
        camera.width = self.parse_dimension("width")?;
        camera.height = self.parse_dimension("height")?;
        Ok(())
    }

    fn parse_vec3(&mut self) -> ParserResult<Vec3> {
        self.match_token("(")?;
        let x = self.parse_float()?;
        self.match_token(",")?;
        let y = self.parse_float()?;
        self.match_token(",")?;
        let z = self.parse_float()?;
        self.match_token(")")?;
        Ok(Vec3::new(x, y, z))
    }

    fn parse_color(&mut self) -> ParserResult<Vec3> {
        let named = match self.peek() {
            "red" => Some(Vec3::new(1.0, 0.0, 0.0)),
            "blue" => Some(Vec3::new(0.0, 0.0, 1.0)),
            "green" => Some(Vec3::new(0.0, 1.0, 0.0)),
            "white" => Some(Vec3::new(1.0, 1.0, 1.0)),
            "black" => Some(Vec3::new(0.0, 0.0, 0.0)),
            "cyan" => Some(Vec3::new(0.0, 1.0, 1.0)),
            "violet" => Some(Vec3::new(0.56, 0.0, 1.0)),
            "fuchsia" => Some(Vec3::new(1.0, 0.0, 1.0)),
            "yellow" => Some(Vec3::new(1.0, 1.0, 0.0)),
            "orange" => Some(Vec3::new(0.98, 0.45, 0.02)),
            _ => None,
        };
        match named {
            Some(color) => {
                self.pop();
                Ok(color)
            }
            None => self.parse_vec3(),
        }
    }

    fn parse_material(&mut self) -> ParserResult<Arc<dyn Material>> {
        let name = self.pop();
        let material: Arc<dyn Material> = match name.as_str() {
            "standard" => Arc::new(StandardMaterial::default()),
            "glass" => Arc::new(StandardMaterial::glass()),
            "gold" => Arc::new(StandardMaterial::gold()),
            "metal" => Arc::new(StandardMaterial::metal()),
            "emerald" => Arc::new(StandardMaterial::emerald()),
            "sky" => Arc::new(StandardMaterial::sky()),
            "checkerboard" => Arc::new(Checkerboard::default()),
            "normals" => Arc::new(SurfaceNormal::default()),
            "noise" => Arc::new(Noise::default()),
            "marble" => Arc::new(Marble::default()),
            "wood" => Arc::new(WoodGrain::default()),
            "solid" => {
                let color = self.parse_color()?;
                match StandardMaterial::new(MaterialParams::solid(color)) {
                    Ok(material) => Arc::new(material),
                    Err(error) => return self.error(&error.to_string()),
                }
            }
            _ => return self.error(&format!("unknown material '{}'", name)),
        };
        Ok(material)
    }

    fn parse_camera(&mut self, camera: &mut CameraConfig) -> ParserResult<()> {
        if !self.maybe_match("camera") {
            return Ok(());
        }
        if self.maybe_match("from") {
            camera.position = self.parse_vec3()?;
        }
        if self.maybe_match("to") {
            camera.look_at = self.parse_vec3()?;
        }
        if self.maybe_match("fov") {
            camera.fov = self.parse_float()?;
        }
        debug!(
            "camera from {:?} to {:?}, fov {}",
            camera.position, camera.look_at, camera.fov
        );
        Ok(())
    }

    /// Accumulates the `>` steps into the primitive's position, rotation and scale.
    /// The steps commute: the result is always applied as scale, then rotation, then
    /// translation, whatever order they are written in.
    fn parse_transformation(&mut self, primitive: &mut Primitive) -> ParserResult<()> {
        while self.maybe_match(">") {
            let name = self.pop();
            match name.as_str() {
                "translate" => {
                    let offset = self.parse_vec3()?;
                    primitive.set_position(primitive.transform().position() + offset);
                }
                "scale" => {
                    let factors = if self.next_is_number() {
                        Vec3::one() * self.parse_float()?
                    } else {
                        self.parse_vec3()?
                    };
                    if factors.x == 0.0 || factors.y == 0.0 || factors.z == 0.0 {
                        return self.error("scale factors must be non zero");
                    }
                    primitive.set_scale(primitive.transform().scale() * factors);
                }
                "rotate" => {
                    let angles = self.parse_vec3()?;
                    primitive.set_rotation(primitive.transform().rotation() + angles);
                }
                _ => return self.error(&format!("unknown transformation '{}'", name)),
            }
        }
        Ok(())
    }

    fn parse_primitive(&mut self, shape: Shape) -> ParserResult<Primitive> {
        self.pop();
        let material = self.parse_material()?;
        let mut primitive = Primitive::unit(shape).with_material(material);
        self.parse_transformation(&mut primitive)?;
        debug!("parsed {:?}", primitive);
        Ok(primitive)
    }

    fn parse_light(&mut self) -> ParserResult<Light> {
        self.match_token("light")?;
        let position = self.parse_vec3()?;
        let color = self.parse_color()?;
        let intensity = if self.next_is_number() {
            self.parse_float()?
        } else {
            1.0
        };
        debug!("light at {:?}, intensity {}", position, intensity);
        Ok(Light::new(position, color, intensity))
    }

    /// Parses a whole scene file.
    pub fn parse_scene(&mut self) -> ParserResult<ImageData> {
        let mut camera = CameraConfig::default();
        self.parse_header(&mut camera)?;
        self.parse_camera(&mut camera)?;

        let mut scene = Scene::new();
        while !self.is_empty() {
            let next_token = self.peek().to_string();
            match next_token.as_str() {
                "light" => {
                    let light = self.parse_light()?;
                    scene.add_light(light);
                }
                "sphere" => {
                    scene.add_object(self.parse_primitive(Shape::Sphere)?);
                }
                "plane" => {
                    scene.add_object(self.parse_primitive(Shape::Plane)?);
                }
                "cube" => {
                    scene.add_object(self.parse_primitive(Shape::Cube)?);
                }
                "cylinder" => {
                    scene.add_object(self.parse_primitive(Shape::Cylinder)?);
                }
                _ => {
                    self.pop();
                    return self.error(&format!("unexpected token '{}'", next_token));
                }
            }
        }
        Ok(ImageData { camera, scene })
    }
}
