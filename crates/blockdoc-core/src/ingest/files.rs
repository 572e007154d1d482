//! File payload handler
//!
//! Image files become image blocks. Anything else degrades to a paragraph
//! naming the file, so a paste of mixed payloads never drops entries
//! silently.

use crate::ingest::clipboard::PastedFile;
use crate::model::block::Block;

pub(crate) fn blocks_from_files(files: &[PastedFile]) -> Vec<Block> {
    files
        .iter()
        .map(|file| {
            if file.mime_type.starts_with("image/") {
                let mut block = Block::image(file.url.clone());
                if !file.name.is_empty() {
                    block = block.with_prop("caption", file.name.clone());
                }
                block
            } else {
                Block::paragraph(file.name.clone())
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file(name: &str, mime: &str) -> PastedFile {
        PastedFile {
            name: name.to_string(),
            mime_type: mime.to_string(),
            url: format!("blob:{}", name),
        }
    }

    #[test]
    fn test_image_file_becomes_image_block() {
        let blocks = blocks_from_files(&[file("a.png", "image/png")]);
        assert_eq!(blocks[0].block_type, "image");
        assert_eq!(blocks[0].props["url"], "blob:a.png");
        assert_eq!(blocks[0].props["caption"], "a.png");
    }

    #[test]
    fn test_other_file_becomes_paragraph() {
        let blocks = blocks_from_files(&[file("notes.pdf", "application/pdf")]);
        assert_eq!(blocks[0].block_type, "paragraph");
    }
}
