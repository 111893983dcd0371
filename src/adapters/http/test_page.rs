//! Minimal upload form for poking at the API without the real client.
//! Enabled with `IS_TEST`, same as the stored tag URL the browser keeps.

use axum::response::Html;

pub async fn show() -> Html<&'static str> {
    Html(
        r#"
        <!doctype html>
        <html>
            <head>
                <title>Create your virtual tag</title>
            </head>
            <body>
                <h1>Customize your virtual tag</h1>
                <form id="tag-form">
                    <div>
                        <label>
                            Full name:
                            <input type="text" name="name" required>
                        </label>
                    </div>
                    <div>
                        <label>
                            How it started:
                            <input type="file" name="then" accept=".png, .jpg, .jpeg" required>
                        </label>
                    </div>
                    <div>
                        <label>
                            How it's going:
                            <input type="file" name="now" accept=".png, .jpg, .jpeg" required>
                        </label>
                    </div>
                    <div>
                        <input type="submit" value="Laminate tag">
                    </div>
                </form>
                <p id="result"></p>
                <script>
                    const result = document.getElementById("result");
                    const existing = window.localStorage.getItem("tagUrl");
                    if (existing) {
                        result.innerHTML = `Your tag: <a href="${existing}">${existing}</a>`;
                    }
                    document.getElementById("tag-form").onsubmit = async (e) => {
                        e.preventDefault();
                        const response = await fetch("/api/images", {
                            method: "POST",
                            body: new FormData(e.target),
                        });
                        const data = await response.json();
                        if (!response.ok) {
                            result.textContent = `Error: ${data.error}`;
                            return;
                        }
                        window.localStorage.setItem("tagUrl", data.result);
                        result.innerHTML = `Your tag: <a href="${data.result}">${data.result}</a>`;
                    };
                </script>
            </body>
        </html>
        "#,
    )
}
