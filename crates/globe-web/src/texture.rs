use crate::{SharedEngine, SharedGpu};
use globe_core::{
    prepare_base_map, FallbackChain, MapSource, TextureError, TextureStatus, UvOrigin,
};
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys as web;

async fn fetch_bytes(url: &str) -> anyhow::Result<Vec<u8>> {
    let window = web::window().ok_or_else(|| anyhow::anyhow!("no window"))?;
    let resp_value = JsFuture::from(window.fetch_with_str(url))
        .await
        .map_err(|e| anyhow::anyhow!("{:?}", e))?;
    let resp: web::Response = resp_value
        .dyn_into()
        .map_err(|e| anyhow::anyhow!("{:?}", e))?;
    if !resp.ok() {
        anyhow::bail!("HTTP {}", resp.status());
    }
    let buf = JsFuture::from(resp.array_buffer().map_err(|e| anyhow::anyhow!("{:?}", e))?)
        .await
        .map_err(|e| anyhow::anyhow!("{:?}", e))?;
    Ok(js_sys::Uint8Array::new(&buf).to_vec())
}

async fn fetch_source(source: MapSource) -> Result<Vec<u8>, TextureError> {
    fetch_bytes(source.url())
        .await
        .map_err(|e| TextureError::Fetch {
            source_kind: source,
            reason: e.to_string(),
        })
}

/// Walk the fallback chain until one base map decodes and uploads. With no
/// usable source the globe keeps its base color and the status reads missing.
pub async fn load_base_map(engine: SharedEngine, gpu: SharedGpu) {
    for source in FallbackChain::default() {
        if engine.borrow().is_torn_down() {
            return;
        }
        let bytes = match fetch_source(source).await {
            Ok(b) => b,
            Err(e) => {
                log::warn!("[texture] {}", e);
                continue;
            }
        };
        let caps = engine.borrow().capabilities;
        let map = match prepare_base_map(&bytes, source, &caps, UvOrigin::TopLeft) {
            Ok(m) => m,
            Err(e) => {
                log::warn!("[texture] {}", e);
                continue;
            }
        };
        if engine.borrow().is_torn_down() {
            return;
        }
        {
            let mut slot = gpu.borrow_mut();
            let Some(gpu) = slot.as_mut() else {
                return;
            };
            gpu.upload_base_map(&map);
        }
        let (width, height) = map.original_size;
        engine
            .borrow_mut()
            .set_texture_status(TextureStatus::Loaded {
                width,
                height,
                source,
            });
        log::info!("[texture] using {:?} map ({}x{})", source, width, height);
        return;
    }
    log::warn!("[texture] {}; keeping the untextured globe", TextureError::Exhausted);
    engine.borrow_mut().set_texture_status(TextureStatus::Missing);
}
