//! Multimedia resources (CT_MultiMedia): images, audio and video.

use crate::common::xml::{XmlElement, XmlWriter};
use crate::common::{Error, Id, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MediaType {
    #[default]
    Image,
    Audio,
    Video,
}

impl MediaType {
    pub fn as_str(self) -> &'static str {
        match self {
            MediaType::Image => "Image",
            MediaType::Audio => "Audio",
            MediaType::Video => "Video",
        }
    }

    fn parse(s: &str) -> Option<Self> {
        match s {
            "Image" => Some(MediaType::Image),
            "Audio" => Some(MediaType::Audio),
            "Video" => Some(MediaType::Video),
            _ => None,
        }
    }
}

/// Pixel layout of an image. Kept in memory only; the format does not
/// persist it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ImageInfo {
    pub width: u32,
    pub height: u32,
    pub components: u8,
    pub bits_per_component: u8,
}

/// A multimedia resource. Images are the common case, see [`Image`].
#[derive(Debug, Clone, Default)]
pub struct MultiMedia {
    pub id: Id,
    pub media_type: MediaType,
    /// Encoding such as `PNG`, `JPEG` or `MP4`.
    pub format: Option<String>,
    /// File name relative to the registry base.
    pub media_file: String,
    pub info: Option<ImageInfo>,
    data: Option<Vec<u8>>,
}

/// Image resources are multimedia resources of type `Image`.
pub type Image = MultiMedia;

impl PartialEq for MultiMedia {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
            && self.media_type == other.media_type
            && self.format == other.format
            && self.media_file == other.media_file
    }
}

impl MultiMedia {
    /// An image with its encoded bytes.
    pub fn image(format: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            media_type: MediaType::Image,
            format: Some(format.into()),
            data: Some(data),
            ..Self::default()
        }
    }

    pub fn video(format: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            media_type: MediaType::Video,
            format: Some(format.into()),
            data: Some(data),
            ..Self::default()
        }
    }

    pub fn with_info(mut self, info: ImageInfo) -> Self {
        self.info = Some(info);
        self
    }

    pub fn is_loaded(&self) -> bool {
        self.data.is_some()
    }

    pub fn data(&self) -> Option<&[u8]> {
        self.data.as_deref()
    }

    pub fn set_data(&mut self, data: Vec<u8>) {
        self.data = Some(data);
    }

    pub fn unload(&mut self) {
        self.data = None;
    }

    /// File extension derived from the declared format.
    pub fn extension(&self) -> &'static str {
        let format = self.format.as_deref().map(str::to_ascii_uppercase);
        match (self.media_type, format.as_deref()) {
            (_, Some("JPEG" | "JPG")) => "jpg",
            (_, Some("BMP")) => "bmp",
            (_, Some("TIFF" | "TIF")) => "tif",
            (_, Some("GIF")) => "gif",
            (_, Some("JB2" | "JBIG2")) => "jb2",
            (_, Some("MP4")) => "mp4",
            (_, Some("MP3")) => "mp3",
            (_, Some("WAV")) => "wav",
            (MediaType::Image, _) => "png",
            (MediaType::Audio, _) => "mp3",
            (MediaType::Video, _) => "mp4",
        }
    }

    /// File name used when the resource is stored by the writer.
    pub fn default_file_name(&self) -> String {
        let stem = match self.media_type {
            MediaType::Image => "Image",
            MediaType::Audio => "Audio",
            MediaType::Video => "Video",
        };
        format!("{stem}_{}.{}", self.id, self.extension())
    }

    pub(crate) fn write_xml(&self, w: &mut XmlWriter) {
        w.open("MultiMedia")
            .attr_id("ID", self.id)
            .attr("Type", self.media_type.as_str());
        if let Some(format) = &self.format {
            w.attr_str_opt("Format", format);
        }
        w.end_attrs()
            .text_element("MediaFile", &self.media_file)
            .close("MultiMedia");
    }

    pub(crate) fn from_xml(el: &XmlElement) -> Result<Self> {
        let type_str = el.required_attr("Type")?;
        let media_type = MediaType::parse(type_str)
            .ok_or_else(|| Error::invalid_value("MultiMedia", "Type", type_str))?;
        let media_file = el
            .child_text("MediaFile")
            .ok_or_else(|| Error::missing_element("MultiMedia", "MediaFile"))?;
        Ok(Self {
            id: el.required_id("ID")?,
            media_type,
            format: el.attr("Format").map(str::to_owned),
            media_file: media_file.to_owned(),
            info: None,
            data: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_media_round_trip() {
        let mut image = MultiMedia::image("JPEG", vec![0xFF, 0xD8]);
        image.id = Id::new(12);
        image.media_file = image.default_file_name();
        assert_eq!(image.media_file, "Image_12.jpg");

        let mut w = XmlWriter::fragment();
        image.write_xml(&mut w);
        let xml = w.into_string();
        let parsed = MultiMedia::from_xml(&XmlElement::parse(xml.as_bytes()).unwrap()).unwrap();
        assert_eq!(parsed, image);
        assert!(!parsed.is_loaded());
    }

    #[test]
    fn test_media_file_required() {
        let el = XmlElement::parse(br#"<MultiMedia ID="1" Type="Image"/>"#).unwrap();
        assert!(matches!(MultiMedia::from_xml(&el), Err(Error::MissingElement { .. })));
    }
}
