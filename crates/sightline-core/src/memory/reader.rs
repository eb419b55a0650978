use glam::Vec3;

use super::RemoteAddr;
use super::process::ProcessHandle;
use crate::error::{Error, Result};

/// A value with a fixed little-endian layout in remote memory.
pub trait FromRemote: Sized {
    /// Number of bytes read for one value.
    const SIZE: usize;

    /// Decode from exactly [`Self::SIZE`] bytes.
    fn from_le_slice(bytes: &[u8]) -> Self;
}

macro_rules! impl_from_remote_primitive {
    ($($ty:ty),* $(,)?) => {
        $(
            impl FromRemote for $ty {
                const SIZE: usize = std::mem::size_of::<$ty>();

                fn from_le_slice(bytes: &[u8]) -> Self {
                    let mut buf = [0u8; std::mem::size_of::<$ty>()];
                    buf.copy_from_slice(&bytes[..Self::SIZE]);
                    <$ty>::from_le_bytes(buf)
                }
            }
        )*
    };
}

impl_from_remote_primitive!(u8, i32, u32, u64, f32);

impl FromRemote for RemoteAddr {
    const SIZE: usize = 8;

    fn from_le_slice(bytes: &[u8]) -> Self {
        RemoteAddr::new(u64::from_le_slice(bytes))
    }
}

impl FromRemote for Vec3 {
    const SIZE: usize = 12;

    fn from_le_slice(bytes: &[u8]) -> Self {
        Vec3::new(
            f32::from_le_slice(&bytes[0..4]),
            f32::from_le_slice(&bytes[4..8]),
            f32::from_le_slice(&bytes[8..12]),
        )
    }
}

/// Typed read access to another process's memory.
///
/// Every call either yields a fully decoded value or an error; there is no
/// retry and no caching.
pub trait ReadMemory {
    fn read_bytes(&self, address: RemoteAddr, size: usize) -> Result<Vec<u8>>;

    fn read<T: FromRemote>(&self, address: RemoteAddr) -> Result<T> {
        let bytes = self.read_bytes(address, T::SIZE)?;
        if bytes.len() < T::SIZE {
            return Err(Error::MemoryReadFailed {
                address: address.get(),
                message: format!("short read: {} of {} bytes", bytes.len(), T::SIZE),
            });
        }
        Ok(T::from_le_slice(&bytes))
    }

    fn read_i32(&self, address: RemoteAddr) -> Result<i32> {
        self.read(address)
    }

    fn read_u64(&self, address: RemoteAddr) -> Result<u64> {
        self.read(address)
    }

    fn read_f32(&self, address: RemoteAddr) -> Result<f32> {
        self.read(address)
    }

    fn read_vec3(&self, address: RemoteAddr) -> Result<Vec3> {
        self.read(address)
    }

    /// Read a pointer-sized value, which may be null.
    fn read_ptr(&self, address: RemoteAddr) -> Result<RemoteAddr> {
        self.read(address)
    }

    /// Read a pointer and reject null.
    fn deref(&self, address: RemoteAddr) -> Result<RemoteAddr> {
        let ptr = self.read_ptr(address)?;
        if ptr.is_null() {
            return Err(Error::NullPointer {
                address: address.get(),
            });
        }
        Ok(ptr)
    }
}

/// Reads memory of an opened [`ProcessHandle`].
pub struct MemoryReader<'a> {
    process: &'a ProcessHandle,
}

impl<'a> MemoryReader<'a> {
    pub fn new(process: &'a ProcessHandle) -> Self {
        Self { process }
    }

    pub fn base_address(&self) -> RemoteAddr {
        self.process.base_address
    }
}

#[cfg(target_os = "windows")]
impl ReadMemory for MemoryReader<'_> {
    fn read_bytes(&self, address: RemoteAddr, size: usize) -> Result<Vec<u8>> {
        use std::ffi::c_void;
        use windows::Win32::System::Diagnostics::Debug::ReadProcessMemory;

        let mut buffer = vec![0u8; size];
        let mut bytes_read = 0usize;

        // SAFETY: the buffer is valid for `size` bytes and the handle stays
        // open for the lifetime of the borrowed ProcessHandle.
        unsafe {
            ReadProcessMemory(
                self.process.raw_handle(),
                address.get() as *const c_void,
                buffer.as_mut_ptr().cast(),
                size,
                Some(&mut bytes_read),
            )
        }
        .map_err(|e| Error::MemoryReadFailed {
            address: address.get(),
            message: e.to_string(),
        })?;

        if bytes_read != size {
            return Err(Error::MemoryReadFailed {
                address: address.get(),
                message: format!("partial read: {} of {} bytes", bytes_read, size),
            });
        }

        Ok(buffer)
    }
}

#[cfg(not(target_os = "windows"))]
impl ReadMemory for MemoryReader<'_> {
    fn read_bytes(&self, address: RemoteAddr, _size: usize) -> Result<Vec<u8>> {
        let _ = (self.process.pid, address);
        Err(Error::Unsupported("remote memory reads require Windows"))
    }
}
