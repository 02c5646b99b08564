// src/wgpu_utils/uniform_block.rs
//! Named uniform blocks
//!
//! A program declares its uniforms as an ordered list of `(name, kind)` pairs.
//! [`UniformLayout`] assigns each field the offset WGSL gives it inside a
//! `var<uniform>` struct, and [`UniformBlock`] keeps the packed host copy that
//! is pushed to a [`UniformBuffer`](super::UniformBuffer) before each draw.

use crate::error::{LifeError, LifeResult};

/// Shader-side type of a uniform field
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum UniformKind {
    Float,
    Int,
    Vec2,
    Vec4,
}

impl UniformKind {
    /// Byte size in a uniform block
    pub fn size(self) -> u64 {
        match self {
            UniformKind::Float | UniformKind::Int => 4,
            UniformKind::Vec2 => 8,
            UniformKind::Vec4 => 16,
        }
    }

    /// WGSL alignment
    pub fn align(self) -> u64 {
        self.size()
    }

    pub fn name(self) -> &'static str {
        match self {
            UniformKind::Float => "f32",
            UniformKind::Int => "i32",
            UniformKind::Vec2 => "vec2<f32>",
            UniformKind::Vec4 => "vec4<f32>",
        }
    }
}

/// Value assigned to a uniform
///
/// Booleans are stored as `i32` (0 or 1) since WGSL uniforms cannot hold `bool`.
#[derive(Clone, Copy, PartialEq, Debug)]
pub enum UniformValue {
    Float(f32),
    Int(i32),
    Bool(bool),
    Vec2([f32; 2]),
    Vec4([f32; 4]),
}

impl UniformValue {
    pub fn kind(&self) -> UniformKind {
        match self {
            UniformValue::Float(_) => UniformKind::Float,
            UniformValue::Int(_) | UniformValue::Bool(_) => UniformKind::Int,
            UniformValue::Vec2(_) => UniformKind::Vec2,
            UniformValue::Vec4(_) => UniformKind::Vec4,
        }
    }

    fn write_to(&self, dst: &mut [u8]) {
        match self {
            UniformValue::Float(v) => dst.copy_from_slice(bytemuck::bytes_of(v)),
            UniformValue::Int(v) => dst.copy_from_slice(bytemuck::bytes_of(v)),
            UniformValue::Bool(v) => dst.copy_from_slice(bytemuck::bytes_of(&(*v as i32))),
            UniformValue::Vec2(v) => dst.copy_from_slice(bytemuck::cast_slice(v)),
            UniformValue::Vec4(v) => dst.copy_from_slice(bytemuck::cast_slice(v)),
        }
    }
}

impl From<f32> for UniformValue {
    fn from(v: f32) -> Self {
        UniformValue::Float(v)
    }
}

impl From<i32> for UniformValue {
    fn from(v: i32) -> Self {
        UniformValue::Int(v)
    }
}

impl From<bool> for UniformValue {
    fn from(v: bool) -> Self {
        UniformValue::Bool(v)
    }
}

impl From<[f32; 2]> for UniformValue {
    fn from(v: [f32; 2]) -> Self {
        UniformValue::Vec2(v)
    }
}

impl From<[f32; 4]> for UniformValue {
    fn from(v: [f32; 4]) -> Self {
        UniformValue::Vec4(v)
    }
}

#[derive(Clone, Debug)]
pub struct UniformField {
    pub name: &'static str,
    pub kind: UniformKind,
    pub offset: u64,
}

/// Offsets of every field in a uniform struct
#[derive(Clone, Debug)]
pub struct UniformLayout {
    fields: Vec<UniformField>,
    size: u64,
}

impl UniformLayout {
    /// Lay out fields in declaration order
    ///
    /// The total size is rounded up to 16 bytes, the alignment of a uniform
    /// struct in WGSL.
    pub fn new(fields: &[(&'static str, UniformKind)]) -> Self {
        let mut offset = 0;
        let mut laid_out = Vec::with_capacity(fields.len());

        for &(name, kind) in fields {
            offset = align_to(offset, kind.align());
            laid_out.push(UniformField { name, kind, offset });
            offset += kind.size();
        }

        UniformLayout {
            fields: laid_out,
            size: align_to(offset, 16).max(16),
        }
    }

    pub fn field(&self, name: &str) -> Option<&UniformField> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn fields(&self) -> &[UniformField] {
        &self.fields
    }

    pub fn size(&self) -> u64 {
        self.size
    }
}

fn align_to(value: u64, align: u64) -> u64 {
    value.div_ceil(align) * align
}

/// Host copy of a program's uniforms
#[derive(Clone, Debug)]
pub struct UniformBlock {
    program: String,
    layout: UniformLayout,
    data: Vec<u8>,
}

impl UniformBlock {
    pub fn new(program: impl Into<String>, layout: UniformLayout) -> Self {
        let data = vec![0; layout.size() as usize];
        UniformBlock {
            program: program.into(),
            layout,
            data,
        }
    }

    /// Assign `value` to the field called `name`
    pub fn set(&mut self, name: &str, value: UniformValue) -> LifeResult<()> {
        let field = self
            .layout
            .field(name)
            .ok_or_else(|| LifeError::UnknownUniform {
                program: self.program.clone(),
                name: name.to_string(),
            })?;

        if field.kind != value.kind() {
            return Err(LifeError::UniformKindMismatch {
                name: name.to_string(),
                expected: field.kind.name(),
                actual: value.kind().name(),
            });
        }

        let start = field.offset as usize;
        let end = start + field.kind.size() as usize;
        value.write_to(&mut self.data[start..end]);
        Ok(())
    }

    pub fn layout(&self) -> &UniformLayout {
        &self.layout
    }

    pub fn bytes(&self) -> &[u8] {
        &self.data
    }
}
