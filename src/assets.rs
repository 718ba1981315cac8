use crate::core::materials::apply_overrides;
use crate::core::{BakedTexture, LabModel, SceneConfig};
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys as web;

/// Decoded assets, ready to upload and bind.
pub struct LoadedLab {
    pub model: LabModel,
    pub texture: BakedTexture,
}

/// Issue the request for `url` right away; the body is read by [`read_bytes`].
pub fn start_fetch(url: &str) -> anyhow::Result<JsFuture> {
    let window = web::window().ok_or_else(|| anyhow::anyhow!("no window"))?;
    Ok(JsFuture::from(window.fetch_with_str(url)))
}

pub async fn read_bytes(url: &str, request: JsFuture) -> anyhow::Result<Vec<u8>> {
    let resp_value = request
        .await
        .map_err(|e| anyhow::anyhow!("fetch {}: {:?}", url, e))?;
    let resp: web::Response = resp_value
        .dyn_into()
        .map_err(|e| anyhow::anyhow!("{:?}", e))?;
    if !resp.ok() {
        anyhow::bail!("fetch {}: HTTP {}", url, resp.status());
    }
    let buf = JsFuture::from(resp.array_buffer().map_err(|e| anyhow::anyhow!("{:?}", e))?)
        .await
        .map_err(|e| anyhow::anyhow!("read {}: {:?}", url, e))?;
    Ok(js_sys::Uint8Array::new(&buf).to_vec())
}

/// Fetch and decode the model and its baked texture, then apply the material overrides.
/// Both requests are in flight at the same time.
pub async fn load_lab(config: &SceneConfig) -> anyhow::Result<LoadedLab> {
    let model_req = start_fetch(&config.model_url)?;
    let texture_req = start_fetch(&config.texture_url)?;
    let model_bytes = read_bytes(&config.model_url, model_req).await?;
    let texture_bytes = read_bytes(&config.texture_url, texture_req).await?;
    log::info!(
        "[assets] fetched model={}B texture={}B",
        model_bytes.len(),
        texture_bytes.len()
    );

    let mut model = LabModel::from_glb(&model_bytes)?;
    apply_overrides(&mut model.graph, &config.material_overrides)?;
    let texture = BakedTexture::decode(&texture_bytes)?;
    log::info!(
        "[assets] texture {}x{} mips={}",
        texture.width(),
        texture.height(),
        texture.levels.len()
    );
    Ok(LoadedLab { model, texture })
}
