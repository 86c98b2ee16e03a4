use anyhow::anyhow;
use gwas_explorer::FileSource;
use wasm_bindgen_futures::JsFuture;
use web_sys::{File, FileList};

/// A file picked in an `<input type="file">` element.
pub struct WebFile(File);

impl WebFile {
    pub fn from_list(list: &FileList) -> Vec<Self> {
        (0..list.length())
            .filter_map(|i| list.get(i))
            .map(WebFile)
            .collect()
    }
}

impl FileSource for WebFile {
    fn name(&self) -> String {
        self.0.name()
    }

    async fn read_text(&self) -> anyhow::Result<String> {
        let text = JsFuture::from(self.0.text())
            .await
            .map_err(|e| anyhow!("{e:?}"))?;
        text.as_string()
            .ok_or_else(|| anyhow!("File content is not text"))
    }
}
