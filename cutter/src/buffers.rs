//! Per-channel vertex storage. A mesh always has positions, every other
//! channel is either present for every vertex or for none of them.

use bitflags::bitflags;
use nalgebra::{Vector3, Vector4};

use crate::{
    error::{CutError, Result},
    vertex::{Color32, Vertex},
    Pos,
};

/// The kinds of vertex attribute a mesh can carry, in layout order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    Position,
    Normal,
    Color,
    TexCoord,
}

bitflags! {
    /// Presence mask over [`Channel`]s.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Channels: u8 {
        const POSITION = 1 << 0;
        const NORMAL = 1 << 1;
        const COLOR = 1 << 2;
        const TEX_COORD = 1 << 3;
    }
}

/// Typed storage for each channel of a mesh. Absent channels are empty.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct VertexBuffer {
    channels: Channels,
    positions: Vec<Pos>,
    normals: Vec<Vector3<f32>>,
    colors: Vec<Color32>,
    tex_coords: Vec<Vector4<f32>>,
}

impl Channel {
    pub const ALL: [Channel; 4] = [
        Channel::Position,
        Channel::Normal,
        Channel::Color,
        Channel::TexCoord,
    ];

    pub fn flag(self) -> Channels {
        match self {
            Channel::Position => Channels::POSITION,
            Channel::Normal => Channels::NORMAL,
            Channel::Color => Channels::COLOR,
            Channel::TexCoord => Channels::TEX_COORD,
        }
    }
}

impl Channels {
    /// Iterates the present channels in layout order.
    pub fn layout(self) -> impl Iterator<Item = Channel> {
        Channel::ALL
            .into_iter()
            .filter(move |channel| self.contains(channel.flag()))
    }
}

impl Default for Channels {
    fn default() -> Self {
        Channels::POSITION
    }
}

impl VertexBuffer {
    /// Creates a buffer holding only positions.
    pub fn new(positions: Vec<Pos>) -> Self {
        Self {
            channels: Channels::POSITION,
            positions,
            ..Default::default()
        }
    }

    /// Creates an empty buffer with the given channels.
    pub fn with_channels(channels: Channels) -> Self {
        Self {
            channels: channels | Channels::POSITION,
            ..Default::default()
        }
    }

    pub fn with_normals(mut self, normals: Vec<Vector3<f32>>) -> Result<Self> {
        self.check_len(Channel::Normal, normals.len())?;
        self.normals = normals;
        self.channels |= Channels::NORMAL;
        Ok(self)
    }

    pub fn with_colors(mut self, colors: Vec<Color32>) -> Result<Self> {
        self.check_len(Channel::Color, colors.len())?;
        self.colors = colors;
        self.channels |= Channels::COLOR;
        Ok(self)
    }

    pub fn with_tex_coords(mut self, tex_coords: Vec<Vector4<f32>>) -> Result<Self> {
        self.check_len(Channel::TexCoord, tex_coords.len())?;
        self.tex_coords = tex_coords;
        self.channels |= Channels::TEX_COORD;
        Ok(self)
    }

    fn check_len(&self, channel: Channel, len: usize) -> Result<()> {
        if len != self.positions.len() {
            return Err(CutError::ChannelLength {
                channel,
                len,
                expected: self.positions.len(),
            });
        }

        Ok(())
    }

    pub fn channels(&self) -> Channels {
        self.channels
    }

    pub fn has(&self, channel: Channel) -> bool {
        self.channels.contains(channel.flag())
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn positions(&self) -> &[Pos] {
        &self.positions
    }

    /// Returns `None` if the channel is absent.
    pub fn normals(&self) -> Option<&[Vector3<f32>]> {
        self.has(Channel::Normal).then_some(self.normals.as_slice())
    }

    pub fn colors(&self) -> Option<&[Color32]> {
        self.has(Channel::Color).then_some(self.colors.as_slice())
    }

    pub fn tex_coords(&self) -> Option<&[Vector4<f32>]> {
        self.has(Channel::TexCoord)
            .then_some(self.tex_coords.as_slice())
    }

    /// Synthesizes the vertex at `index`, filling absent channels with
    /// neutral values. Panics if `index` is out of range.
    pub fn vertex(&self, index: usize) -> Vertex {
        let mut vertex = Vertex::new(self.positions[index]);
        if self.has(Channel::Normal) {
            vertex.normal = self.normals[index];
        }
        if self.has(Channel::Color) {
            vertex.color = self.colors[index];
        }
        if self.has(Channel::TexCoord) {
            vertex.tex_coord = self.tex_coords[index];
        }
        vertex
    }

    /// Appends a vertex, storing only the channels this buffer has.
    pub fn push(&mut self, vertex: &Vertex) {
        for channel in self.channels.layout() {
            match channel {
                Channel::Position => self.positions.push(vertex.position),
                Channel::Normal => self.normals.push(vertex.normal),
                Channel::Color => self.colors.push(vertex.color),
                Channel::TexCoord => self.tex_coords.push(vertex.tex_coord),
            }
        }
    }

    /// Builds a new buffer with the same channel layout holding every
    /// original vertex followed by `appended`.
    pub fn extend_with(&self, appended: &[Vertex]) -> Result<VertexBuffer> {
        let len = self.len() + appended.len();
        let mut out = VertexBuffer::with_channels(self.channels);

        for channel in self.channels.layout() {
            match channel {
                Channel::Position => {
                    copy_channel(&mut out.positions, &self.positions, len, appended, |v| {
                        v.position
                    })?
                }
                Channel::Normal => {
                    copy_channel(&mut out.normals, &self.normals, len, appended, |v| v.normal)?
                }
                Channel::Color => {
                    copy_channel(&mut out.colors, &self.colors, len, appended, |v| v.color)?
                }
                Channel::TexCoord => {
                    copy_channel(&mut out.tex_coords, &self.tex_coords, len, appended, |v| {
                        v.tex_coord
                    })?
                }
            }
        }

        Ok(out)
    }
}

fn copy_channel<T: Copy>(
    target: &mut Vec<T>,
    original: &[T],
    len: usize,
    appended: &[Vertex],
    get: impl Fn(&Vertex) -> T,
) -> Result<()> {
    target.try_reserve_exact(len)?;
    target.extend_from_slice(original);
    target.extend(appended.iter().map(get));
    Ok(())
}
