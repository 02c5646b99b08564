//! Arena of simulation textures
//!
//! Textures are allocated once when the engine is built and addressed by
//! [`TextureId`]. Swapping two ids is how the state and temp buffers trade
//! places between generations.

use super::texture_resource::TextureResource;

/// Handle to a texture in a [`TextureStore`]
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct TextureId(usize);

#[derive(Default)]
pub struct TextureStore {
    textures: Vec<TextureResource>,
}

impl TextureStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, texture: TextureResource) -> TextureId {
        self.textures.push(texture);
        TextureId(self.textures.len() - 1)
    }

    /// Ids are only handed out by [`insert`](Self::insert) and nothing is
    /// ever removed, so every id indexes a live slot.
    pub fn get(&self, id: TextureId) -> &TextureResource {
        &self.textures[id.0]
    }

    pub fn len(&self) -> usize {
        self.textures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.textures.is_empty()
    }
}
