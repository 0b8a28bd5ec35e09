/// A base layout with overridable header and content blocks.
pub fn base_layout() -> &'static str {
    concat!(
        "<html><tag:Header><h1>{{tag:Var name=\"site\"}}</h1></tag:Header>",
        "<tag:Content><p>base</p></tag:Content></html>",
    )
}

/// A child layout that extends the base content and keeps the header.
pub fn child_layout() -> &'static str {
    concat!(
        "<html><tag:Header><h1>{{tag:Var name=\"site\"}}</h1></tag:Header>",
        "<tag:Content><p>child</p>{{tag:Parent}}</tag:Content></html>",
    )
}

/// A post listing using the core tags.
pub fn post_list() -> &'static str {
    concat!(
        "<ul><tag:Each var=\"posts\"><li>{{tag:Var name=\"title\"}}</li></tag:Each></ul>",
        "<tag:If var=\"footer\"><footer>{{tag:Var name=\"footer\"}}</footer></tag:If>",
        "<tag:Comment>not rendered</tag:Comment>",
    )
}
