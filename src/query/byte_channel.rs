// Copyright 2023-2026 The hyperdb-client authors
//
// Licensed under the Apache License, Version 2.0 (the "License"); you may not
// use this file except in compliance with the License. You may obtain a copy of
// the License at http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS, WITHOUT
// WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied. See the
// License for the specific language governing permissions and limitations under
// the License.

use bytes::{Buf, Bytes};

use crate::errors::{Error, Result};

/// A pull source of binary result frames.
///
/// Implementations skip non-payload wire messages (pure status updates)
/// internally; `Ok(None)` means the source is exhausted, not that a message
/// lacked a payload. Frames are [`Bytes`] slices of the wire buffer, so
/// passing them on copies nothing.
#[async_trait::async_trait]
pub trait PayloadStream: Send {
    /// The next binary frame, or `Ok(None)` once the source is exhausted.
    async fn next_payload(&mut self) -> Result<Option<Bytes>>;
}

#[async_trait::async_trait]
impl PayloadStream for Box<dyn PayloadStream> {
    async fn next_payload(&mut self) -> Result<Option<Bytes>> {
        (**self).next_payload().await
    }
}

/// Adapts a [`PayloadStream`] into a readable byte channel for the
/// record-batch decoder.
///
/// At most one frame is held at a time and bytes move by slicing, so peak
/// memory stays proportional to a single wire message regardless of result
/// size. The channel stays open after end-of-stream; only [`close`] ends its
/// life, after which reads fail with [`Error::ChannelClosed`].
///
/// [`close`]: ResultByteChannel::close
pub struct ResultByteChannel<S> {
    source: S,
    current: Bytes,
    exhausted: bool,
    open: bool,
}

impl<S: PayloadStream> ResultByteChannel<S> {
    /// Wraps `source`; the channel takes exclusive ownership of it.
    pub fn new(source: S) -> Self {
        ResultByteChannel {
            source,
            current: Bytes::new(),
            exhausted: false,
            open: true,
        }
    }

    /// Fills `dst` from the source. Returns the number of bytes written;
    /// zero means end-of-stream (or an empty `dst`). Zero-length frames are
    /// passed over, never reported as end-of-stream.
    pub async fn read(&mut self, dst: &mut [u8]) -> Result<usize> {
        if !self.open {
            return Err(Error::ChannelClosed);
        }
        let mut written = 0;
        while written < dst.len() {
            if self.current.is_empty() {
                if self.exhausted {
                    break;
                }
                match self.source.next_payload().await? {
                    Some(frame) => self.current = frame,
                    None => {
                        self.exhausted = true;
                        break;
                    }
                }
                continue;
            }
            let n = self.current.len().min(dst.len() - written);
            dst[written..written + n].copy_from_slice(&self.current[..n]);
            self.current.advance(n);
            written += n;
        }
        Ok(written)
    }

    /// Whether [`close`](Self::close) has not been called yet. End-of-stream
    /// does not close the channel.
    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Closes the channel. Idempotent; subsequent reads fail with
    /// [`Error::ChannelClosed`].
    pub fn close(&mut self) {
        self.open = false;
        self.current = Bytes::new();
    }

    /// Releases the underlying source.
    pub fn into_inner(self) -> S {
        self.source
    }
}
