//! Windows version numbers from `HKLM\SOFTWARE\Microsoft\Windows NT\CurrentVersion`.
//!
//! `sysinfo` reports the kernel as the bare build number and the OS as
//! `"{major} ({build})"`, neither of which fills a `major.minor.patch-build`
//! quad.  The registry carries all four numbers.

use hostctl_core::domain::introspection::VersionQuad;
use windows::core::{w, PCWSTR};
use windows::Win32::Foundation::ERROR_SUCCESS;
use windows::Win32::System::Registry::{
    RegGetValueW, HKEY_LOCAL_MACHINE, RRF_RT_REG_DWORD, RRF_RT_REG_SZ,
};

const CURRENT_VERSION: PCWSTR = w!(r"SOFTWARE\Microsoft\Windows NT\CurrentVersion");

/// `major.minor.build-ubr` of the running Windows, or `None` if the
/// registry values are unavailable (pre-Windows 10 hosts lack the major
/// and minor DWORDs).
pub(crate) fn current_version() -> Option<VersionQuad> {
    let major = read_dword(w!("CurrentMajorVersionNumber"))?;
    let minor = read_dword(w!("CurrentMinorVersionNumber"))?;
    let build = read_string(w!("CurrentBuildNumber"))?;
    let ubr = read_dword(w!("UBR")).unwrap_or(0);
    Some(VersionQuad::from_nt(major, minor, &build, ubr))
}

fn read_dword(name: PCWSTR) -> Option<u32> {
    let mut value = 0u32;
    let mut size = std::mem::size_of::<u32>() as u32;
    // SAFETY: `value` and `size` describe a live, correctly sized buffer.
    let status = unsafe {
        RegGetValueW(
            HKEY_LOCAL_MACHINE,
            CURRENT_VERSION,
            name,
            RRF_RT_REG_DWORD,
            None,
            Some(&mut value as *mut u32 as *mut _),
            Some(&mut size),
        )
    };
    (status == ERROR_SUCCESS).then_some(value)
}

fn read_string(name: PCWSTR) -> Option<String> {
    let mut buf = [0u16; 64];
    let mut size = std::mem::size_of_val(&buf) as u32;
    // SAFETY: `buf` and `size` describe a live buffer; the value is
    // NUL-terminated by `RegGetValueW` on success.
    let status = unsafe {
        RegGetValueW(
            HKEY_LOCAL_MACHINE,
            CURRENT_VERSION,
            name,
            RRF_RT_REG_SZ,
            None,
            Some(buf.as_mut_ptr() as *mut _),
            Some(&mut size),
        )
    };
    if status != ERROR_SUCCESS {
        return None;
    }
    let len = buf.iter().position(|&c| c == 0).unwrap_or(buf.len());
    Some(String::from_utf16_lossy(&buf[..len]))
}
