use qrcode::QrCode;
use qrcode::render::{svg, unicode};
use url::Url;

use crate::error::{PresenterError, ValidationError};

/// Public addresses of a link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShareLinks {
    /// `/s/{slug}`, redirects end users to the target.
    pub redirect: Url,
    /// `/share/{slug}`, the share page.
    pub share: Url,
}

fn link_at(origin: &Url, prefix: &str, slug: &str) -> Result<Url, ValidationError> {
    let mut url = origin.clone();
    url.set_query(None);
    url.set_fragment(None);
    url.path_segments_mut()
        .map_err(|_| ValidationError::InvalidUrl(origin.to_string()))?
        .clear()
        .push(prefix)
        .push(slug);
    Ok(url)
}

pub fn share_links(origin: &Url, slug: &str) -> Result<ShareLinks, ValidationError> {
    Ok(ShareLinks {
        redirect: link_at(origin, "s", slug)?,
        share: link_at(origin, "share", slug)?,
    })
}

/// QR code of `target` drawn with half-block characters.
pub fn qr_terminal(target: &Url) -> Result<String, PresenterError> {
    let code = QrCode::new(target.as_str().as_bytes())?;
    Ok(code
        .render::<unicode::Dense1x2>()
        .dark_color(unicode::Dense1x2::Light)
        .light_color(unicode::Dense1x2::Dark)
        .quiet_zone(true)
        .build())
}

pub fn qr_svg(target: &Url) -> Result<String, PresenterError> {
    let code = QrCode::new(target.as_str().as_bytes())?;
    Ok(code
        .render::<svg::Color>()
        .min_dimensions(200, 200)
        .quiet_zone(true)
        .build())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn links_hang_off_the_origin_root() {
        let origin = Url::parse("https://links.example.com/admin/?tab=1#top").unwrap();
        let links = share_links(&origin, "gh").unwrap();
        assert_eq!(links.redirect.as_str(), "https://links.example.com/s/gh");
        assert_eq!(links.share.as_str(), "https://links.example.com/share/gh");
    }

    #[test]
    fn slugs_are_percent_encoded() {
        let origin = Url::parse("http://localhost:8080").unwrap();
        let links = share_links(&origin, "a b/c").unwrap();
        assert_eq!(links.redirect.as_str(), "http://localhost:8080/s/a%20b%2Fc");
    }

    #[test]
    fn opaque_origins_are_rejected() {
        let origin = Url::parse("mailto:admin@example.com").unwrap();
        assert!(share_links(&origin, "gh").is_err());
    }

    #[test]
    fn qr_codes_render() {
        let target = Url::parse("http://localhost:8080/s/gh").unwrap();
        let svg = qr_svg(&target).unwrap();
        assert!(svg.contains("<svg"));
        let terminal = qr_terminal(&target).unwrap();
        assert!(terminal.lines().count() > 10);
    }
}
