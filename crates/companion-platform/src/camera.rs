//! `getUserMedia` camera adapter.
//!
//! Granted streams wait in a pending table until the controller binds or
//! releases them. The bound stream feeds a detached `<video>` element and
//! frames are copied through a detached `<canvas>` to produce JPEG data
//! URLs and preview pixels.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;

use async_trait::async_trait;
use gloo_utils::format::JsValueSerdeExt;
use serde_json::json;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{
    CanvasRenderingContext2d, HtmlCanvasElement, HtmlVideoElement, MediaStream,
    MediaStreamConstraints, MediaStreamTrack,
};

use companion_core::ports::{CameraPort, PreviewFrame, StreamHandle};
use companion_types::{CompanionError, Result};

/// `HTMLMediaElement.HAVE_ENOUGH_DATA`
const HAVE_ENOUGH_DATA: u16 = 4;

fn js_err(e: JsValue) -> CompanionError {
    CompanionError::JsInterop(format!("{:?}", e))
}

fn camera_err(e: JsValue) -> CompanionError {
    CompanionError::Camera(format!("{:?}", e))
}

fn stop_tracks(stream: &MediaStream) {
    for track in stream.get_tracks().iter() {
        if let Ok(track) = track.dyn_into::<MediaStreamTrack>() {
            track.stop();
        }
    }
}

/// A granted stream and the size it was requested at
struct Grant {
    stream: MediaStream,
    width: u32,
    height: u32,
}

/// Camera adapter over `navigator.mediaDevices`
pub struct BrowserCamera {
    video: HtmlVideoElement,
    canvas: HtmlCanvasElement,
    next_handle: Cell<u64>,
    pending: RefCell<HashMap<StreamHandle, Grant>>,
    bound: RefCell<Option<(StreamHandle, MediaStream)>>,
}

impl BrowserCamera {
    pub fn new() -> Result<Self> {
        let document = web_sys::window()
            .and_then(|w| w.document())
            .ok_or_else(|| CompanionError::JsInterop("No document".to_string()))?;

        let video: HtmlVideoElement = document
            .create_element("video")
            .map_err(js_err)?
            .dyn_into()
            .map_err(|_| CompanionError::JsInterop("Element is not a video".to_string()))?;
        video.set_autoplay(true);
        video.set_muted(true);
        video.set_attribute("playsinline", "").map_err(js_err)?;

        let canvas: HtmlCanvasElement = document
            .create_element("canvas")
            .map_err(js_err)?
            .dyn_into()
            .map_err(|_| CompanionError::JsInterop("Element is not a canvas".to_string()))?;

        Ok(Self {
            video,
            canvas,
            next_handle: Cell::new(1),
            pending: RefCell::new(HashMap::new()),
            bound: RefCell::new(None),
        })
    }

    fn context(&self) -> Result<CanvasRenderingContext2d> {
        self.canvas
            .get_context("2d")
            .map_err(js_err)?
            .ok_or_else(|| CompanionError::JsInterop("No 2d context".to_string()))?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(|_| CompanionError::JsInterop("Not a 2d context".to_string()))
    }
}

impl BrowserCamera {
    /// Copy the current video frame onto the canvas. `false` when there is
    /// no bound stream or no decodable frame yet.
    fn draw_frame(&self, ctx: &CanvasRenderingContext2d) -> Result<bool> {
        if self.bound.borrow().is_none() || self.video.ready_state() < HAVE_ENOUGH_DATA {
            return Ok(false);
        }
        ctx.draw_image_with_html_video_element_and_dw_and_dh(
            &self.video,
            0.0,
            0.0,
            self.canvas.width() as f64,
            self.canvas.height() as f64,
        )
        .map_err(js_err)?;
        Ok(true)
    }
}

#[async_trait(?Send)]
impl CameraPort for BrowserCamera {
    async fn open(&self, width: u32, height: u32) -> Result<StreamHandle> {
        let window = web_sys::window()
            .ok_or_else(|| CompanionError::JsInterop("No window".to_string()))?;
        let devices = window.navigator().media_devices().map_err(camera_err)?;

        let video = JsValue::from_serde(&json!({ "width": width, "height": height }))?;
        let constraints = MediaStreamConstraints::new();
        constraints.set_video(&video);
        constraints.set_audio(&JsValue::FALSE);

        let promise = devices
            .get_user_media_with_constraints(&constraints)
            .map_err(camera_err)?;
        let stream: MediaStream = JsFuture::from(promise)
            .await
            .map_err(camera_err)?
            .dyn_into()
            .map_err(|_| CompanionError::Camera("getUserMedia returned no stream".to_string()))?;

        let handle = StreamHandle(self.next_handle.get());
        self.next_handle.set(handle.0 + 1);
        self.pending
            .borrow_mut()
            .insert(handle, Grant { stream, width, height });
        log::debug!("Camera stream {} granted", handle.0);
        Ok(handle)
    }

    fn bind(&self, stream: StreamHandle) -> Result<()> {
        let grant = self
            .pending
            .borrow_mut()
            .remove(&stream)
            .ok_or_else(|| CompanionError::Camera(format!("Unknown stream {}", stream.0)))?;
        if let Some((old, previous)) = self.bound.borrow_mut().take() {
            log::debug!("Replacing bound camera stream {}", old.0);
            stop_tracks(&previous);
        }

        self.video.set_src_object(Some(&grant.stream));
        // autoplay covers the case where play() is rejected
        let _ = self.video.play();
        self.canvas.set_width(grant.width);
        self.canvas.set_height(grant.height);
        *self.bound.borrow_mut() = Some((stream, grant.stream));
        log::info!("Camera stream bound at {}x{}", grant.width, grant.height);
        Ok(())
    }

    fn release_stream(&self, stream: StreamHandle) {
        if let Some(grant) = self.pending.borrow_mut().remove(&stream) {
            stop_tracks(&grant.stream);
            return;
        }
        let is_bound = matches!(&*self.bound.borrow(), Some((h, _)) if *h == stream);
        if is_bound {
            self.release();
        }
    }

    fn capture_frame(&self, jpeg_quality: f64) -> Result<Option<String>> {
        let ctx = self.context()?;
        if !self.draw_frame(&ctx)? {
            return Ok(None);
        }
        let url = self
            .canvas
            .to_data_url_with_type_and_encoder_options("image/jpeg", &JsValue::from_f64(jpeg_quality))
            .map_err(js_err)?;
        Ok(Some(url))
    }

    fn preview_frame(&self) -> Result<Option<PreviewFrame>> {
        let ctx = self.context()?;
        if !self.draw_frame(&ctx)? {
            return Ok(None);
        }
        let (width, height) = (self.canvas.width(), self.canvas.height());
        let image = ctx
            .get_image_data(0.0, 0.0, width as f64, height as f64)
            .map_err(js_err)?;
        Ok(Some(PreviewFrame {
            width: width as usize,
            height: height as usize,
            rgba: image.data().0,
        }))
    }

    fn release(&self) {
        if let Some((_, stream)) = self.bound.borrow_mut().take() {
            stop_tracks(&stream);
        }
        self.video.set_src_object(None);
    }

    fn is_open(&self) -> bool {
        self.bound.borrow().is_some()
    }
}
