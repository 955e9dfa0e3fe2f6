//! Page index listing: one link per catalog page key.

use crate::api::models::Catalog;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryLink {
    pub label: String,
    pub href: String,
}

/// Links in catalog order, each pointing at `<key>.html`.
pub fn entry_links(catalog: &Catalog) -> Vec<EntryLink> {
    catalog
        .pages()
        .map(|key| EntryLink {
            label: key.to_string(),
            href: format!("{key}.html"),
        })
        .collect()
}

/// Fill `#entries` when present and still empty. Returns the number of
/// links added.
#[cfg(target_arch = "wasm32")]
pub fn populate_entries(container_id: &str, catalog: &Catalog) -> usize {
    let Some(doc) = crate::components::dom::document() else {
        return 0;
    };
    let Some(container) = doc.get_element_by_id(container_id) else {
        return 0;
    };
    if container.child_element_count() > 0 {
        return 0;
    }
    let mut added = 0;
    for link in entry_links(catalog) {
        let (Ok(item), Ok(anchor)) = (doc.create_element("li"), doc.create_element("a")) else {
            break;
        };
        let _ = anchor.set_attribute("href", &link.href);
        anchor.set_text_content(Some(&link.label));
        let _ = item.append_child(&anchor);
        let _ = container.append_child(&item);
        added += 1;
    }
    added
}
