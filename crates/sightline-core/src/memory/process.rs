//! Target process and module discovery.

use super::RemoteAddr;
use crate::error::{Error, Result};

/// An opened target process together with the base address of the module
/// the offset table is relative to.
pub struct ProcessHandle {
    pub pid: u32,
    pub base_address: RemoteAddr,
    #[cfg(target_os = "windows")]
    handle: windows::Win32::Foundation::HANDLE,
}

impl ProcessHandle {
    /// Find `process_name`, resolve `module_name` inside it and open the
    /// process for reading.
    #[cfg(target_os = "windows")]
    pub fn find_and_open(process_name: &str, module_name: &str) -> Result<Self> {
        use windows::Win32::System::Threading::{OpenProcess, PROCESS_VM_READ};

        let pid = find_process_id(process_name)?;
        let base_address = find_module_base(pid, module_name)?;

        // SAFETY: OpenProcess has no preconditions; failure is reported via Result.
        let handle = unsafe { OpenProcess(PROCESS_VM_READ, false, pid) }
            .map_err(|e| Error::ProcessOpenFailed(format!("pid {}: {}", pid, e)))?;

        Ok(Self {
            pid,
            base_address,
            handle,
        })
    }

    #[cfg(not(target_os = "windows"))]
    pub fn find_and_open(process_name: &str, module_name: &str) -> Result<Self> {
        let _ = (process_name, module_name);
        Err(Error::Unsupported("process discovery requires Windows"))
    }

    #[cfg(target_os = "windows")]
    pub(crate) fn raw_handle(&self) -> windows::Win32::Foundation::HANDLE {
        self.handle
    }
}

#[cfg(target_os = "windows")]
impl Drop for ProcessHandle {
    fn drop(&mut self) {
        use windows::Win32::Foundation::CloseHandle;

        // SAFETY: the handle was returned by OpenProcess and is closed once.
        let _ = unsafe { CloseHandle(self.handle) };
    }
}

/// Decode a NUL-terminated UTF-16 buffer.
pub fn wide_to_string(buf: &[u16]) -> String {
    let end = buf.iter().position(|&c| c == 0).unwrap_or(buf.len());
    String::from_utf16_lossy(&buf[..end])
}

#[cfg(target_os = "windows")]
fn find_process_id(process_name: &str) -> Result<u32> {
    use windows::Win32::Foundation::CloseHandle;
    use windows::Win32::System::Diagnostics::ToolHelp::{
        CreateToolhelp32Snapshot, PROCESSENTRY32W, Process32FirstW, Process32NextW,
        TH32CS_SNAPPROCESS,
    };

    // SAFETY: snapshot handle is closed before returning; the entry struct
    // is sized as the API requires.
    unsafe {
        let snapshot = CreateToolhelp32Snapshot(TH32CS_SNAPPROCESS, 0)
            .map_err(|e| Error::ProcessNotFound(format!("{}: {}", process_name, e)))?;

        let mut entry = PROCESSENTRY32W {
            dwSize: std::mem::size_of::<PROCESSENTRY32W>() as u32,
            ..Default::default()
        };

        let mut found = None;
        if Process32FirstW(snapshot, &mut entry).is_ok() {
            loop {
                if wide_to_string(&entry.szExeFile).eq_ignore_ascii_case(process_name) {
                    found = Some(entry.th32ProcessID);
                    break;
                }
                if Process32NextW(snapshot, &mut entry).is_err() {
                    break;
                }
            }
        }
        let _ = CloseHandle(snapshot);

        found.ok_or_else(|| Error::ProcessNotFound(process_name.to_string()))
    }
}

#[cfg(target_os = "windows")]
fn find_module_base(pid: u32, module_name: &str) -> Result<RemoteAddr> {
    use windows::Win32::Foundation::CloseHandle;
    use windows::Win32::System::Diagnostics::ToolHelp::{
        CreateToolhelp32Snapshot, MODULEENTRY32W, Module32FirstW, Module32NextW,
        TH32CS_SNAPMODULE, TH32CS_SNAPMODULE32,
    };

    let not_found = || Error::ModuleNotFound {
        module: module_name.to_string(),
        pid,
    };

    // SAFETY: see find_process_id.
    unsafe {
        let snapshot = CreateToolhelp32Snapshot(TH32CS_SNAPMODULE | TH32CS_SNAPMODULE32, pid)
            .map_err(|_| not_found())?;

        let mut entry = MODULEENTRY32W {
            dwSize: std::mem::size_of::<MODULEENTRY32W>() as u32,
            ..Default::default()
        };

        let mut found = None;
        if Module32FirstW(snapshot, &mut entry).is_ok() {
            loop {
                if wide_to_string(&entry.szModule).eq_ignore_ascii_case(module_name) {
                    found = Some(RemoteAddr::new(entry.modBaseAddr as u64));
                    break;
                }
                if Module32NextW(snapshot, &mut entry).is_err() {
                    break;
                }
            }
        }
        let _ = CloseHandle(snapshot);

        found.ok_or_else(not_found)
    }
}
