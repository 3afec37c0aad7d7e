use voice_navigation::browser::driver::StaticPage;
use voice_navigation::interpret::interpreter::InterpretReply;
use voice_navigation::page::builder::build_page_model;
use voice_navigation::page::dom::DomNode;
use voice_navigation::page::page_model::PageModel;

/// A small marketing site page with the structures the resolver cares
/// about: a nav bar, a contact form with labelled fields, a newsletter
/// form (second email input on the page), standalone links, and a
/// role-button widget. Node handles are exposed so tests can assert which
/// live element an execution touched.
pub struct CorporatePage {
    pub page: StaticPage,
    pub contact_form: u32,
    pub name_field: u32,
    pub email_field: u32,
    pub message_field: u32,
    pub send_button: u32,
    pub newsletter_form: u32,
    pub newsletter_email: u32,
    pub subscribe_button: u32,
    pub home_link: u32,
    pub pricing_link: u32,
    pub about_link: u32,
    pub story_link: u32,
    pub twitter_link: u32,
    pub menu_button: u32,
}

pub fn corporate_page() -> CorporatePage {
    let mut page = StaticPage::new("https://acme.example/", "Acme Rockets").with_language("en");

    let header = page.push(DomNode::new("header"));
    let nav = page.push(DomNode::new("nav").with_parent(header));
    let home_link = page.push(
        DomNode::new("a")
            .with_text("Home")
            .with_href("/")
            .with_parent(nav),
    );
    page.push(
        DomNode::new("a")
            .with_text("Products")
            .with_href("/products")
            .with_parent(nav),
    );
    let pricing_link = page.push(
        DomNode::new("a")
            .with_text("Pricing")
            .with_href("/pricing")
            .with_parent(nav),
    );
    let about_link = page.push(
        DomNode::new("a")
            .with_text("About Us")
            .with_href("/about")
            .with_parent(nav),
    );
    page.push(
        DomNode::new("a")
            .with_text("Contact")
            .with_href("/contact")
            .with_parent(nav),
    );

    let main = page.push(DomNode::new("main"));
    page.push(
        DomNode::new("h1")
            .with_text("Ship faster with Acme")
            .with_parent(main),
    );
    page.push(
        DomNode::new("h2")
            .with_text("What we do")
            .with_parent(main),
    );

    let contact_form = page.push(
        DomNode::new("form")
            .with_id("contact-form")
            .with_action("/api/contact")
            .with_method("post"),
    );
    page.push(
        DomNode::new("label")
            .with_text("Your name")
            .with_for_target("contact-name"),
    );
    let name_field = page.push(
        DomNode::new("input")
            .with_type("text")
            .with_id("contact-name")
            .with_name("name")
            .in_form(contact_form),
    );
    page.push(
        DomNode::new("label")
            .with_text("Work email")
            .with_for_target("contact-email"),
    );
    let email_field = page.push(
        DomNode::new("input")
            .with_type("email")
            .with_id("contact-email")
            .with_name("email")
            .in_form(contact_form),
    );
    let message_field = page.push(
        DomNode::new("textarea")
            .with_id("contact-message")
            .with_name("message")
            .with_placeholder("How can we help?")
            .in_form(contact_form),
    );
    let send_button = page.push(
        DomNode::new("button")
            .with_type("submit")
            .with_text("Send message")
            .in_form(contact_form),
    );

    let newsletter_form = page.push(DomNode::new("form").with_id("newsletter"));
    let newsletter_email = page.push(
        DomNode::new("input")
            .with_type("email")
            .with_name("newsletter_email")
            .with_placeholder("Email address")
            .in_form(newsletter_form),
    );
    let subscribe_button = page.push(
        DomNode::new("input")
            .with_type("submit")
            .with_value("Subscribe")
            .in_form(newsletter_form),
    );

    let story_link = page.push(
        DomNode::new("a")
            .with_text("Read our story")
            .with_href("/about/story")
            .with_parent(main),
    );

    let footer = page.push(DomNode::new("footer"));
    let twitter_link = page.push(
        DomNode::new("a")
            .with_text("Twitter")
            .with_href("https://twitter.com/acme")
            .with_parent(footer),
    );

    let menu_button = page.push(
        DomNode::new("div")
            .with_role("button")
            .with_id("menu-toggle")
            .with_text("Open menu"),
    );
    page.push(DomNode::new("section").with_aria_label("Testimonials"));

    page.set_main_text(
        "Acme builds rocket components for small launch providers. \
         Our catalogue covers avionics, fuel pumps, and ground support \
         equipment, all tested in house.",
    );

    CorporatePage {
        page,
        contact_form,
        name_field,
        email_field,
        message_field,
        send_button,
        newsletter_form,
        newsletter_email,
        subscribe_button,
        home_link,
        pricing_link,
        about_link,
        story_link,
        twitter_link,
        menu_button,
    }
}

/// Model of the corporate page, built the way a live session would.
pub fn corporate_model(fixture: &mut CorporatePage) -> PageModel {
    use voice_navigation::browser::driver::PageDriver;
    let snapshot = fixture.page.snapshot().unwrap();
    build_page_model(&snapshot)
}

/// A one-form page with a single email input, for the uniqueness
/// shortcut paths.
pub struct SignupPage {
    pub page: StaticPage,
    pub email_field: u32,
    pub join_button: u32,
}

pub fn signup_page() -> SignupPage {
    let mut page = StaticPage::new("https://acme.example/signup", "Join Acme");

    let form = page.push(DomNode::new("form").with_id("signup"));
    let email_field = page.push(
        DomNode::new("input")
            .with_type("email")
            .with_name("email")
            .in_form(form),
    );
    let join_button = page.push(
        DomNode::new("button")
            .with_type("submit")
            .with_text("Join now")
            .in_form(form),
    );

    SignupPage {
        page,
        email_field,
        join_button,
    }
}

/// Shorthand for canned interpreter replies.
pub fn reply(action: Option<&str>, response: Option<&str>) -> InterpretReply {
    InterpretReply {
        action: action.map(str::to_string),
        response: response.map(str::to_string),
        ..Default::default()
    }
}

pub fn reply_with_param(action: &str, key: &str, value: &str) -> InterpretReply {
    let mut parameters = serde_json::Map::new();
    parameters.insert(key.to_string(), serde_json::Value::String(value.to_string()));
    InterpretReply {
        action: Some(action.to_string()),
        parameters,
        ..Default::default()
    }
}
