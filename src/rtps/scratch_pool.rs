/// Reusable scratch buffers for assembling outbound submessages without a
/// per-message allocation. `release_scratch` keeps the buffer's capacity
/// (`Vec::clear`, not a fresh `Vec::new`) so later reserves skip reallocating.
#[derive(Default)]
pub struct ScratchPool {
  free: Vec<Vec<u8>>,
}

impl ScratchPool {
  pub fn new() -> ScratchPool {
    ScratchPool::default()
  }

  pub fn reserve_scratch(&mut self, min_size: usize) -> Vec<u8> {
    match self.free.pop() {
      Some(mut buf) => {
        buf.clear();
        if buf.capacity() < min_size {
          buf.reserve(min_size - buf.capacity());
        }
        buf
      }
      None => Vec::with_capacity(min_size),
    }
  }

  pub fn release_scratch(&mut self, buf: Vec<u8>) {
    self.free.push(buf);
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn released_buffer_is_reused_and_cleared() {
    let mut pool = ScratchPool::new();
    let mut buf = pool.reserve_scratch(64);
    buf.extend_from_slice(&[1, 2, 3]);
    let capacity = buf.capacity();
    pool.release_scratch(buf);

    let reused = pool.reserve_scratch(8);
    assert!(reused.is_empty());
    assert!(reused.capacity() >= capacity.min(8));
  }
}
