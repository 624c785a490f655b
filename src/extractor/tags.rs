//! Tag families and catalogs.
//!
//! Families drive the node transformer dispatch; catalogs drive document
//! cleaning, the potential tag set and output sanitizing. All lists are
//! small, so lookups are linear scans over static slices.

/// Lists.
pub const LIST_TAGS: &[&str] = &["ul", "ol", "dl"];

/// Quotes and preformatted blocks.
pub const QUOTE_TAGS: &[&str] = &["blockquote", "pre", "q"];

/// Headings; `summary` is relabeled on output.
pub const HEAD_TAGS: &[&str] = &["h1", "h2", "h3", "h4", "h5", "h6", "summary"];

/// Line breaks.
pub const LB_TAGS: &[&str] = &["br", "hr"];

/// Inline formatting.
pub const HI_TAGS: &[&str] = &[
    "em", "i", "b", "strong", "u", "kbd", "samp", "tt", "var", "sub", "sup", "mark",
];

/// Links.
pub const REF_TAGS: &[&str] = &["a"];

/// Images.
pub const GRAPHIC_TAGS: &[&str] = &["img"];

/// List items.
pub const ITEM_TAGS: &[&str] = &["dd", "dt", "li"];

/// Table cells.
pub const CELL_TAGS: &[&str] = &["th", "td"];

/// Deleted text.
pub const DEL_TAGS: &[&str] = &["del", "s", "strike"];

/// Removed with their subtree during document cleaning.
pub const TAGS_TO_CLEAN: &[&str] = &[
    "aside", "embed", "footer", "form", "head", "iframe", "menu", "object", "script",
    "applet", "audio", "canvas", "figure", "map", "picture", "svg", "video",
    "area", "blink", "button", "datalist", "dialog", "frame", "frameset", "fieldset",
    "link", "input", "ins", "label", "legend", "marquee", "math", "menuitem", "nav",
    "noscript", "optgroup", "option", "output", "param", "progress", "rp", "rt", "rtc",
    "select", "source", "style", "track", "textarea", "time", "use",
];

/// Unwrapped during document cleaning.
pub const TAGS_TO_STRIP: &[&str] = &[
    "abbr", "acronym", "address", "bdi", "bdo", "big", "cite", "data", "dfn", "font",
    "hgroup", "img", "ins", "mark", "meta", "ruby", "small", "template",
    "tbody", "tfoot", "thead",
];

/// Deleted when they end up with neither children nor text.
pub const EMPTY_TAGS_TO_REMOVE: &[&str] = &[
    "article", "b", "blockquote", "dd", "div", "dt", "em",
    "h1", "h2", "h3", "h4", "h5", "h6", "i", "li", "main",
    "p", "pre", "q", "section", "span", "strong",
];

/// Default potential tag set, also the comment tag catalog.
pub const TAG_CATALOG: &[&str] = &[
    "blockquote", "code",
    "del", "s", "strike",
    "h1", "h2", "h3", "h4", "h5", "h6",
    "em", "i", "b", "strong", "u", "kbd", "samp", "tt", "var", "sub", "sup",
    "br", "hr",
    "ul", "ol", "dl",
    "p", "pre", "q",
    "details", "summary",
];

/// Formatting tags unwrapped when formatting is not kept or the tree is too large.
pub const FORMAT_TAG_CATALOG: &[&str] = &[
    "em", "i", "b", "strong", "u", "kbd", "samp", "tt", "var", "sub", "sup",
];

/// HTML tags allowed to survive fallback sanitizing.
pub const VALID_TAG_CATALOG: &[&str] = &[
    "a", "abbr", "address", "area", "b", "base", "bdo", "blockquote", "body", "br", "button",
    "caption", "cite", "code", "col", "colgroup", "dd", "del", "dfn", "div", "dl", "dt", "em",
    "fieldset", "form", "h1", "h2", "h3", "h4", "h5", "h6", "head", "hr", "html", "i", "iframe",
    "img", "input", "ins", "kbd", "label", "legend", "li", "link", "map", "menu", "meta",
    "noscript", "object", "ol", "optgroup", "option", "p", "param", "pre", "q", "s", "samp",
    "script", "select", "small", "span", "strong", "style", "sub", "sup", "table", "tbody",
    "td", "textarea", "tfoot", "th", "thead", "title", "tr", "u", "ul", "var", "article",
    "aside", "audio", "canvas", "command", "datalist", "details", "embed", "figcaption",
    "figure", "footer", "header", "mark", "meter", "nav", "output", "progress", "rp", "rt",
    "ruby", "section", "source", "summary", "time", "track", "video", "wbr",
];

/// Removed from fallback output before sanitizing.
pub const TAGS_TO_SANITIZE: &[&str] = &[
    "aside", "audio", "button", "fieldset", "figure", "footer", "iframe",
    "input", "label", "link", "nav", "noindex", "noscript",
    "object", "option", "select", "source", "svg", "time",
];

/// Elements allowed to keep `width` and `height`.
pub const ELEMENTS_WITH_SIZE_ATTR: &[&str] = &["table", "th", "td", "hr", "pre"];

/// Presentational and identification attributes dropped from output.
pub const PRESENTATIONAL_ATTRIBUTES: &[&str] = &[
    "id", "class", "align", "background", "bgcolor", "border", "cellpadding",
    "cellspacing", "frame", "hspace", "rules", "style", "valign", "vspace",
];

/// Attributes allowed on output elements.
pub const ALLOWED_ATTRIBUTES: &[&str] = &[
    "abbr", "accept-charset", "accept", "accesskey", "action", "align", "alink",
    "allow", "allowfullscreen", "allowpaymentrequest", "alt", "archive", "as",
    "async", "autocapitalize", "autocomplete", "autocorrect", "autofocus",
    "autoplay", "autopictureinpicture", "axis", "background", "behavior",
    "bgcolor", "border", "bordercolor", "capture", "cellpadding", "cellspacing",
    "char", "challenge", "charoff", "charset", "checked", "cite", "class",
    "classid", "clear", "code", "codebase", "codetype", "color", "cols",
    "colspan", "compact", "content", "contenteditable", "controls",
    "controlslist", "conversiondestination", "coords", "crossorigin",
    "csp", "data", "datetime", "declare", "decoding", "default", "defer",
    "dir", "direction", "dirname", "disabled", "disablepictureinpicture",
    "disableremoteplayback", "disallowdocumentaccess", "download", "draggable",
    "elementtiming", "enctype", "end", "enterkeyhint", "event", "exportparts",
    "face", "for", "form", "formaction", "formenctype", "formmethod",
    "formnovalidate", "formtarget", "frame", "frameborder", "headers",
    "height", "hidden", "high", "href", "hreflang", "hreftranslate", "hspace",
    "http-equiv", "id", "imagesizes", "imagesrcset", "importance",
    "impressiondata", "impressionexpiry", "incremental", "inert", "inputmode",
    "integrity", "is", "ismap", "keytype", "kind", "invisible", "label", "lang",
    "language", "latencyhint", "leftmargin", "link", "list", "loading", "longdesc",
    "loop", "low", "lowsrc", "manifest", "marginheight", "marginwidth", "max",
    "maxlength", "mayscript", "media", "method", "min", "minlength", "multiple",
    "muted", "name", "nohref", "nomodule", "nonce", "noresize", "noshade",
    "novalidate", "nowrap", "object", "open", "optimum", "part", "pattern",
    "placeholder", "playsinline", "ping", "policy", "poster", "preload", "pseudo",
    "readonly", "referrerpolicy", "rel", "reportingorigin", "required", "resources",
    "rev", "reversed", "role", "rows", "rowspan", "rules", "sandbox", "scheme",
    "scope", "scrollamount", "scrolldelay", "scrolling", "select", "selected",
    "shadowroot", "shadowrootdelegatesfocus", "shape", "size", "sizes", "slot",
    "span", "spellcheck", "src", "srcset", "srcdoc", "srclang", "standby", "start",
    "step", "style", "summary", "tabindex", "target", "text", "title", "topmargin",
    "translate", "truespeed", "trusttoken", "type", "usemap", "valign", "value",
    "valuetype", "version", "vlink", "vspace", "virtualkeyboardpolicy",
    "webkitdirectory", "width", "wrap",
];

/// Check whether `tag` belongs to `family`.
#[inline]
#[must_use]
pub fn is_in(family: &[&str], tag: &str) -> bool {
    family.contains(&tag)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_families() {
        assert!(is_in(LIST_TAGS, "dl"));
        assert!(!is_in(LIST_TAGS, "li"));
        assert!(is_in(HEAD_TAGS, "summary"));
        assert!(is_in(HI_TAGS, "mark"));
        assert!(is_in(CELL_TAGS, "th"));
        assert!(!is_in(CELL_TAGS, "tr"));
    }

    #[test]
    fn test_tag_catalog_excludes_optional_tags() {
        assert!(is_in(TAG_CATALOG, "p"));
        assert!(!is_in(TAG_CATALOG, "div"));
        assert!(!is_in(TAG_CATALOG, "table"));
        assert!(!is_in(TAG_CATALOG, "a"));
    }

    #[test]
    fn test_cleaning_lists_are_disjoint_where_it_matters() {
        for tag in ["script", "style", "nav", "footer"] {
            assert!(is_in(TAGS_TO_CLEAN, tag));
            assert!(!is_in(TAGS_TO_STRIP, tag));
        }
        assert!(is_in(TAGS_TO_STRIP, "thead"));
    }

    #[test]
    fn test_attribute_catalogs() {
        assert!(is_in(ALLOWED_ATTRIBUTES, "href"));
        assert!(!is_in(ALLOWED_ATTRIBUTES, "onclick"));
        assert!(is_in(PRESENTATIONAL_ATTRIBUTES, "style"));
        assert!(is_in(ELEMENTS_WITH_SIZE_ATTR, "td"));
    }
}
