// ── HICON construction ────────────────────────────────────────────────────────

#![allow(unsafe_code)]

use std::ffi::c_void;

use windows::Win32::{
    Foundation::{BOOL, HANDLE, HWND},
    Graphics::Gdi::{
        CreateBitmap, CreateDIBSection, DeleteObject, GetDC, ReleaseDC, BITMAPINFO,
        BITMAPV5HEADER, BI_BITFIELDS, DIB_RGB_COLORS,
    },
    UI::WindowsAndMessaging::{CreateIconIndirect, HICON, ICONINFO},
};

use crate::error::{Result, SashError};
use crate::icon::Image;

/// Build an alpha-blended icon from `image`.  The caller owns the result and
/// must release it with `DestroyIcon`.
pub(crate) fn create_icon(image: &Image) -> Result<HICON> {
    let width = i32::try_from(image.width()).map_err(|_| invalid(image))?;
    let height = i32::try_from(image.height()).map_err(|_| invalid(image))?;

    let header = BITMAPV5HEADER {
        // BITMAPV5HEADER is 124 bytes; the cast is lossless.
        bV5Size: std::mem::size_of::<BITMAPV5HEADER>() as u32,
        bV5Width: width,
        // Negative height: top-down rows, matching `Image`.
        bV5Height: -height,
        bV5Planes: 1,
        bV5BitCount: 32,
        bV5Compression: BI_BITFIELDS,
        bV5RedMask: 0x00ff_0000,
        bV5GreenMask: 0x0000_ff00,
        bV5BlueMask: 0x0000_00ff,
        bV5AlphaMask: 0xff00_0000,
        ..Default::default()
    };

    let mut bits: *mut c_void = std::ptr::null_mut();

    // SAFETY: the screen DC is released immediately after use; header is a
    // valid BITMAPV5HEADER, which CreateDIBSection accepts through a
    // BITMAPINFO pointer.
    let color = unsafe {
        let hdc = GetDC(HWND::default());
        let bitmap = CreateDIBSection(
            hdc,
            &header as *const BITMAPV5HEADER as *const BITMAPINFO,
            DIB_RGB_COLORS,
            &mut bits,
            HANDLE::default(),
            0,
        );
        ReleaseDC(HWND::default(), hdc);
        bitmap
    }
    .map_err(|_| SashError::OutOfMemory("allocating icon bitmap"))?;

    if bits.is_null() {
        // SAFETY: color was just created and is not selected anywhere.
        unsafe {
            let _ = DeleteObject(color);
        }
        return Err(SashError::OutOfMemory("allocating icon bitmap"));
    }

    let bgra = image.to_bgra();
    // SAFETY: CreateDIBSection allocated width*height*4 bytes at `bits`,
    // which is exactly bgra.len() since Image validated its buffer.
    unsafe {
        std::ptr::copy_nonoverlapping(bgra.as_ptr(), bits.cast::<u8>(), bgra.len());
    }

    // The mask is ignored for 32-bit colour bitmaps with alpha but must exist.
    // SAFETY: a 1bpp bitmap with no initial bits has no preconditions.
    let mask = unsafe { CreateBitmap(width, height, 1, 1, None) };

    let info = ICONINFO {
        fIcon: BOOL::from(true),
        xHotspot: 0,
        yHotspot: 0,
        hbmMask: mask,
        hbmColor: color,
    };

    // SAFETY: info holds two live bitmaps; CreateIconIndirect copies them,
    // so both are deleted afterwards regardless of the outcome.
    let icon = unsafe {
        let icon = CreateIconIndirect(&info);
        let _ = DeleteObject(mask);
        let _ = DeleteObject(color);
        icon
    };

    icon.map_err(SashError::from)
}

fn invalid(image: &Image) -> SashError {
    SashError::InvalidImage {
        width: image.width(),
        height: image.height(),
        len: image.pixels().len(),
    }
}
