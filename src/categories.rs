/// A scrapeable listing category on unegui.mn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CategoryDescriptor {
    pub key: &'static str,
    pub label: &'static str,
    pub url: &'static str,
    /// File name template; the stem is extended with the filter suffix and
    /// a timestamp when saving.
    pub default_output: &'static str,
}

impl CategoryDescriptor {
    pub fn output_stem(&self) -> &'static str {
        self.default_output
            .rsplit_once('.')
            .map(|(stem, _)| stem)
            .unwrap_or(self.default_output)
    }
}

const CATEGORIES: [CategoryDescriptor; 8] = [
    CategoryDescriptor {
        key: "apartments",
        label: "Орон сууц зарна",
        url: "https://www.unegui.mn/l-hdlh/l-hdlh-zarna/oron-suuts-zarna/",
        default_output: "unegui_apartments.csv",
    },
    CategoryDescriptor {
        key: "land",
        label: "Газар зарна",
        url: "https://www.unegui.mn/l-hdlh/l-hdlh-zarna/gazar/",
        default_output: "unegui_land.csv",
    },
    CategoryDescriptor {
        key: "commercial",
        label: "Худалдаа үйлчилгээний талбай",
        url: "https://www.unegui.mn/l-hdlh/l-hdlh-zarna/hudaldaa-jlchilgeenij-talbaj-zarna/",
        default_output: "unegui_commercial.csv",
    },
    CategoryDescriptor {
        key: "houses",
        label: "АОС, хаус, зуслан",
        url: "https://www.unegui.mn/l-hdlh/l-hdlh-zarna/a-o-s-hauszuslan/",
        default_output: "unegui_houses.csv",
    },
    CategoryDescriptor {
        key: "factory_warehouse",
        label: "Үйлдвэр, агуулах, объект",
        url: "https://www.unegui.mn/l-hdlh/l-hdlh-zarna/obekt/",
        default_output: "unegui_factory_warehouse.csv",
    },
    CategoryDescriptor {
        key: "ger_fenced",
        label: "Хашаа байшин, гэр",
        url: "https://www.unegui.mn/l-hdlh/l-hdlh-zarna/hashaa-bajshin/",
        default_output: "unegui_ger_fenced.csv",
    },
    CategoryDescriptor {
        key: "office",
        label: "Ажлын байр, оффис",
        url: "https://www.unegui.mn/l-hdlh/l-hdlh-zarna/azhlyin-bajroffis-zarna/",
        default_output: "unegui_office.csv",
    },
    CategoryDescriptor {
        key: "garage_storage",
        label: "Гараж, склад, контейнер",
        url: "https://www.unegui.mn/l-hdlh/l-hdlh-zarna/garazhskladkont-r/",
        default_output: "unegui_garage_storage.csv",
    },
];

/// Every known category, in display order.
pub fn all() -> &'static [CategoryDescriptor] {
    &CATEGORIES
}

pub fn find(key: &str) -> Option<&'static CategoryDescriptor> {
    CATEGORIES.iter().find(|c| c.key == key)
}
