#![cfg(windows)]

use windows::Win32::Foundation::{
    BOOL, CloseHandle, ERROR_FILE_NOT_FOUND, GetLastError, HANDLE, HMODULE, MAX_PATH, WAIT_EVENT,
    WAIT_FAILED,
};
use windows::Win32::Storage::FileSystem::{GetFileAttributesW, INVALID_FILE_ATTRIBUTES};
use windows::Win32::System::LibraryLoader::GetModuleFileNameW;
use windows::Win32::System::Threading::{
    CreateProcessW, GetExitCodeProcess, INFINITE, PROCESS_CREATION_FLAGS, PROCESS_INFORMATION,
    STARTUPINFOW, WaitForSingleObject,
};
use windows::core::{PCWSTR, PWSTR};

use crate::error::LaunchError;
use crate::host::Host;
use crate::utils::{from_utf16, to_utf16};

/// Host backed by the Win32 API.
#[derive(Debug, Default, Clone, Copy)]
pub struct WindowsHost;

/// Closes the wrapped handle when dropped.
struct OwnedHandle(HANDLE);

impl Drop for OwnedHandle {
    fn drop(&mut self) {
        if !self.0.is_invalid() {
            unsafe {
                let _ = CloseHandle(self.0);
            }
        }
    }
}

/// Win32 error code carried by an HRESULT of the `FACILITY_WIN32` form, or the
/// raw HRESULT bits otherwise.
fn win32_code(e: &windows::core::Error) -> u32 {
    let hr = e.code().0 as u32;
    if hr & 0xFFFF_0000 == 0x8007_0000 {
        hr & 0xFFFF
    } else {
        hr
    }
}

/// A failed wait leaves the child running; its exit code would read as
/// `STILL_ACTIVE`.
fn check_wait(event: WAIT_EVENT) -> Result<(), LaunchError> {
    if event == WAIT_FAILED {
        let err = unsafe { GetLastError() };
        return Err(LaunchError::Wait { code: err.0 });
    }
    Ok(())
}

impl Host for WindowsHost {
    fn current_exe(&self) -> Result<String, LaunchError> {
        let mut buf = [0u16; MAX_PATH as usize];
        let len = unsafe { GetModuleFileNameW(HMODULE::default(), &mut buf) };
        if len == 0 {
            let err = unsafe { GetLastError() };
            return Err(LaunchError::PathResolution {
                reason: format!("GetModuleFileNameW failed with error code: {}", err.0),
            });
        }
        if len == MAX_PATH {
            return Err(LaunchError::PathResolution {
                reason: format!("module path longer than {} characters", MAX_PATH),
            });
        }
        Ok(from_utf16(&buf, len as usize))
    }

    fn exists(&self, path: &str) -> bool {
        let wide = to_utf16(path);
        unsafe { GetFileAttributesW(PCWSTR(wide.as_ptr())) != INVALID_FILE_ATTRIBUTES }
    }

    fn spawn_and_wait(&self, command_line: &str) -> Result<u32, LaunchError> {
        // CreateProcessW may write into the command line buffer.
        let mut command = to_utf16(command_line);
        let startup_info = STARTUPINFOW {
            cb: std::mem::size_of::<STARTUPINFOW>() as u32,
            ..Default::default()
        };
        let mut process_info = PROCESS_INFORMATION::default();

        let created = unsafe {
            CreateProcessW(
                PCWSTR::null(),
                PWSTR(command.as_mut_ptr()),
                None,
                None,
                BOOL::from(false),
                PROCESS_CREATION_FLAGS(0),
                None,
                PCWSTR::null(),
                &startup_info,
                &mut process_info,
            )
        };
        if let Err(e) = created {
            let code = win32_code(&e);
            tracing::debug!(code, "CreateProcessW failed: {}", e);
            return Err(if code == ERROR_FILE_NOT_FOUND.0 {
                LaunchError::InterpreterNotFound {
                    command: command_line.to_string(),
                }
            } else {
                LaunchError::ProcessCreation {
                    command: command_line.to_string(),
                    code,
                }
            });
        }

        let process = OwnedHandle(process_info.hProcess);
        let _thread = OwnedHandle(process_info.hThread);

        check_wait(unsafe { WaitForSingleObject(process.0, INFINITE) })?;
        let mut exit_code = 0u32;
        unsafe { GetExitCodeProcess(process.0, &mut exit_code) }.map_err(|e| LaunchError::Wait {
            code: win32_code(&e),
        })?;
        Ok(exit_code)
    }
}
