//! # Status Window Module
//!
//! Creates the small "Searching for DLSS file..." window that appears,
//! minimized, while the search runs. The program has no console, so
//! without this the only sign of life during a long scan would be the
//! process list.
//!
//! The window is never pumped: the search runs synchronously on the same
//! thread, and the message boxes shown afterwards run their own modal
//! loops. The window simply exists until the process exits. A message
//! loop would only become necessary with a multithreaded search.

use windows::core::{w, Result};
use windows::Win32::Foundation::{HWND, LPARAM, LRESULT, WPARAM};
use windows::Win32::System::LibraryLoader::GetModuleHandleW;
use windows::Win32::UI::WindowsAndMessaging::{
    CreateWindowExW, DefWindowProcW, PostQuitMessage, RegisterClassW, ShowWindow, UpdateWindow,
    CW_USEDEFAULT, SW_SHOWMINIMIZED, WINDOW_EX_STYLE, WM_DESTROY, WNDCLASSW, WS_CAPTION,
    WS_OVERLAPPEDWINDOW, WS_THICKFRAME,
};

/// Registers the window class and shows the minimized status window.
///
/// # Returns
/// * `Ok(hwnd)` - The window is up; the handle is not needed afterwards.
/// * `Err(..)` - The window could not be created. The caller treats this
///   as a general failure and exits without any further UI.
pub fn show_status_window() -> Result<HWND> {
    unsafe {
        let instance = GetModuleHandleW(None)?;
        let class_name = w!("DLSSFinder");

        let wc = WNDCLASSW {
            lpfnWndProc: Some(window_proc),
            hInstance: instance.into(),
            lpszClassName: class_name,
            ..Default::default()
        };

        // A zero atom means registration failed; CreateWindowExW will then
        // fail on the unknown class and carry the error out.
        let atom = RegisterClassW(&wc);
        debug_assert!(atom != 0);

        // A fixed-size window with no caption bar, shown minimized so it
        // sits in the taskbar instead of covering the game directory.
        let hwnd = CreateWindowExW(
            WINDOW_EX_STYLE::default(),
            class_name,
            w!("Searching for DLSS file..."),
            WS_OVERLAPPEDWINDOW & !WS_THICKFRAME & !WS_CAPTION,
            CW_USEDEFAULT,
            CW_USEDEFAULT,
            350,
            30,
            None,
            None,
            Some(instance.into()),
            None,
        )?;

        let _ = ShowWindow(hwnd, SW_SHOWMINIMIZED);
        let _ = UpdateWindow(hwnd);

        Ok(hwnd)
    }
}

extern "system" fn window_proc(hwnd: HWND, msg: u32, wparam: WPARAM, lparam: LPARAM) -> LRESULT {
    match msg {
        WM_DESTROY => {
            unsafe { PostQuitMessage(0) };
            LRESULT(0)
        }
        _ => unsafe { DefWindowProcW(hwnd, msg, wparam, lparam) },
    }
}
