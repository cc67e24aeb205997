//! URL helpers for DTI pages and rendered images.

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use url::form_urlencoded;

use crate::enums::{LayerImageSize, PetPose};

pub const DTI_BASE: &str = "https://impress-2020.openneo.net";
pub const LEGACY_BASE: &str = "https://impress.openneo.net";
pub(crate) const LEGACY_BASE_HTTP: &str = "http://impress.openneo.net";
pub(crate) const UPLOADS_BASE: &str = "https://openneo-uploads.s3.amazonaws.com";

/// Unreserved characters plus `/` stay literal inside a `layerUrls` entry.
const LAYER_URL: &AsciiSet = &NON_ALPHANUMERIC.remove(b'-').remove(b'.').remove(b'_').remove(b'~').remove(b'/');

/// Server-side render URL for a stack of layer images, bottom to top.
pub fn build_layers_url<S: AsRef<str>>(layers: &[S], size: LayerImageSize) -> String {
    let joined = layers
        .iter()
        .map(|layer| utf8_percent_encode(layer.as_ref(), LAYER_URL).to_string())
        .collect::<Vec<_>>()
        .join(",");
    format!("{DTI_BASE}/api/outfitImage?size={}&layerUrls={joined}", size.pixels())
}

/// Render URL of the classic DTI outfit image endpoint.
pub fn outfit_image_url(species_id: u32, color_id: u32, pose: PetPose, style: Option<u64>, item_ids: &[u64]) -> String {
    let mut query = form_urlencoded::Serializer::new(String::new());
    query
        .append_pair("species", &species_id.to_string())
        .append_pair("color", &color_id.to_string())
        .append_pair("pose", pose.name());
    if let Some(style) = style {
        query.append_pair("style", &style.to_string());
    }
    for id in item_ids {
        query.append_pair("objects[]", &id.to_string());
    }
    format!("{LEGACY_BASE}/outfits/new.png?{}", query.finish())
}

/// Neopets image urls sometimes come back protocol-relative.
pub fn sanitize_url(url: &str) -> String {
    match url.strip_prefix("//") {
        Some(rest) if rest.starts_with("images.neopets.com/") => format!("https://{rest}"),
        _ => url.to_string(),
    }
}
