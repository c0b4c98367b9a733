//! 收据合并服务 - 业务能力层
//!
//! 把截图作为新的一页追加到收据 PDF 末尾，水平居中

use std::fs;
use std::path::{Path, PathBuf};

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, ObjectId, Stream};
use tracing::{debug, info};

use crate::error::MergeError;

/// 找不到 MediaBox 时使用 A4（单位 pt）
const A4: (f32, f32) = (595.0, 842.0);
/// 图片与页边的距离
const MARGIN: f32 = 36.0;

/// 把截图追加到收据 PDF
///
/// 先写入同目录下的临时文件再替换原文件，任何失败都不会留下写了一半的收据。
/// 文档在内存中处理，函数返回时句柄已全部释放。
pub fn embed_screenshot_to_receipt(screenshot: &Path, receipt: &Path) -> Result<(), MergeError> {
    let mut doc = Document::load(receipt)?;
    let image = load_image_xobject(screenshot)?;
    append_image_page(&mut doc, image)?;
    doc.compress();

    let tmp_path = temp_path(receipt);
    if let Err(e) = doc.save(&tmp_path) {
        let _ = fs::remove_file(&tmp_path);
        return Err(e.into());
    }
    fs::rename(&tmp_path, receipt)?;

    info!("📎 截图已嵌入收据: {}", receipt.display());
    Ok(())
}

/// 读取截图并转换为 PDF 图像对象（DeviceRGB）
fn load_image_xobject(path: &Path) -> Result<Stream, MergeError> {
    let bytes = fs::read(path)?;
    let rgb = image::load_from_memory(&bytes)?.to_rgb8();
    let (width, height) = rgb.dimensions();
    debug!("截图尺寸: {}x{}", width, height);

    Ok(Stream::new(
        dictionary! {
            "Type" => "XObject",
            "Subtype" => "Image",
            "Width" => width as i64,
            "Height" => height as i64,
            "ColorSpace" => "DeviceRGB",
            "BitsPerComponent" => 8,
        },
        rgb.into_raw(),
    ))
}

/// 在文档末尾新建一页并放置图片
fn append_image_page(doc: &mut Document, image: Stream) -> Result<ObjectId, MergeError> {
    let img_w = image.dict.get(b"Width")?.as_i64()? as f32;
    let img_h = image.dict.get(b"Height")?.as_i64()? as f32;

    let catalog_id = doc.trailer.get(b"Root")?.as_reference()?;
    let pages_id = doc.get_dictionary(catalog_id)?.get(b"Pages")?.as_reference()?;
    let (page_w, page_h) = first_page_size(doc, pages_id);

    // 等比缩放到页边距以内，水平居中，靠上放置
    let scale = ((page_w - 2.0 * MARGIN) / img_w)
        .min((page_h - 2.0 * MARGIN) / img_h)
        .min(1.0);
    let (draw_w, draw_h) = (img_w * scale, img_h * scale);
    let x = (page_w - draw_w) / 2.0;
    let y = page_h - MARGIN - draw_h;

    let image_id = doc.add_object(image);
    let content = Content {
        operations: vec![
            Operation::new("q", vec![]),
            Operation::new(
                "cm",
                vec![
                    draw_w.into(),
                    0f32.into(),
                    0f32.into(),
                    draw_h.into(),
                    x.into(),
                    y.into(),
                ],
            ),
            Operation::new("Do", vec![Object::Name(b"Im1".to_vec())]),
            Operation::new("Q", vec![]),
        ],
    };
    let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode()?));

    let page_id = doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "MediaBox" => vec![0f32.into(), 0f32.into(), page_w.into(), page_h.into()],
        "Contents" => content_id,
        "Resources" => dictionary! {
            "XObject" => dictionary! { "Im1" => image_id },
        },
    });

    let pages = doc.get_object_mut(pages_id)?.as_dict_mut()?;
    pages.get_mut(b"Kids")?.as_array_mut()?.push(page_id.into());
    let count = pages.get(b"Count")?.as_i64()?;
    pages.set("Count", count + 1);

    Ok(page_id)
}

/// 新页面与第一页同尺寸
fn first_page_size(doc: &Document, pages_id: ObjectId) -> (f32, f32) {
    let first_page = doc.get_pages().values().next().copied();
    first_page
        .and_then(|id| media_box(doc, id))
        .or_else(|| media_box(doc, pages_id))
        .unwrap_or(A4)
}

fn media_box(doc: &Document, id: ObjectId) -> Option<(f32, f32)> {
    let dict = doc.get_dictionary(id).ok()?;
    let rect = dict.get(b"MediaBox").ok()?.as_array().ok()?;
    if rect.len() != 4 {
        return None;
    }
    let coord = |i: usize| rect[i].as_float().ok();
    Some((coord(2)? - coord(0)?, coord(3)? - coord(1)?))
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".tmp");
    path.with_file_name(name)
}
